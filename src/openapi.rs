use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Motoparts API",
        version = "0.3.0",
        description = r#"
Parts-lot inventory ledger for a motorcycle repair shop.

Stock arrives in lots (one batch of a part at a fixed purchase price),
is consumed against repair orders, and every movement lands in an
append-only history. The warehouse endpoints answer which lots should
cover a need, oldest stock first.
"#
    ),
    paths(
        crate::handlers::inventory::receive_stock,
        crate::handlers::inventory::export_stock,
        crate::handlers::warehouse::suggest_allocation,
        crate::handlers::warehouse::warehouse_info,
        crate::handlers::warehouse::lot_movements,
        crate::handlers::warehouse::part_lots,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::inventory::ReceiveResponse,
        crate::handlers::inventory::ExportResponse,
        crate::handlers::warehouse::MovementView,
        crate::services::inventory::ReceiveBatch,
        crate::services::inventory::ReceiveItem,
        crate::services::inventory::ExportRequest,
        crate::services::inventory::ExportItem,
        crate::services::allocation::LotCandidate,
        crate::services::allocation::WarehouseInfo,
        crate::services::allocation::LotWithStock,
    )),
    tags(
        (name = "inventory", description = "Receive and export part lots"),
        (name = "warehouse", description = "Allocation suggestions and warehouse queries")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the spec at /api-docs/openapi.json
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_catalog_tables::Migration),
            Box::new(m20240301_000002_create_ledger_tables::Migration),
            Box::new(m20240301_000003_create_repair_orders_table::Migration),
        ]
    }
}

mod m20240301_000001_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::SupplierId)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Address).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Website).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Parts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Parts::PartId)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Parts::Name).string().not_null())
                        .col(ColumnDef::new(Parts::Unit).string().not_null())
                        .col(ColumnDef::new(Parts::ReferencePrice).big_integer().null())
                        .col(ColumnDef::new(Parts::ImageUrl).string().null())
                        .col(ColumnDef::new(Parts::SupplierId).big_integer().null())
                        .col(
                            ColumnDef::new(Parts::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_parts_supplier_id")
                                .from(Parts::Table, Parts::SupplierId)
                                .to(Suppliers::Table, Suppliers::SupplierId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_parts_supplier_id")
                        .table(Parts::Table)
                        .col(Parts::SupplierId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Parts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Suppliers {
        Table,
        SupplierId,
        Name,
        Phone,
        Address,
        Email,
        Website,
    }

    #[derive(DeriveIden)]
    pub(super) enum Parts {
        Table,
        PartId,
        Name,
        Unit,
        ReferencePrice,
        ImageUrl,
        SupplierId,
        IsDeleted,
    }
}

mod m20240301_000002_create_ledger_tables {

    use super::m20240301_000001_create_catalog_tables::Parts;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_ledger_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PartLots::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PartLots::LotId)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PartLots::PartId).big_integer().not_null())
                        .col(
                            ColumnDef::new(PartLots::ReceivedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PartLots::UnitCost).big_integer().not_null())
                        .col(
                            ColumnDef::new(PartLots::ReceivedQuantity)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_part_lots_part_id")
                                .from(PartLots::Table, PartLots::PartId)
                                .to(Parts::Table, Parts::PartId),
                        )
                        .to_owned(),
                )
                .await?;

            // FIFO scans read (part_id, received_at) together
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_part_lots_part_id_received_at")
                        .table(PartLots::Table)
                        .col(PartLots::PartId)
                        .col(PartLots::ReceivedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockRecords::LotId)
                                .big_integer()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockRecords::RemainingQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockRecords::Location).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_records_lot_id")
                                .from(StockRecords::Table, StockRecords::LotId)
                                .to(PartLots::Table, PartLots::LotId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MovementEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MovementEntries::EntryId)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MovementEntries::LotId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MovementEntries::OccurredAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MovementEntries::Direction)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MovementEntries::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MovementEntries::Note).text().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_movement_entries_lot_id")
                                .from(MovementEntries::Table, MovementEntries::LotId)
                                .to(PartLots::Table, PartLots::LotId),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movement_entries_lot_id_occurred_at")
                        .table(MovementEntries::Table)
                        .col(MovementEntries::LotId)
                        .col(MovementEntries::OccurredAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MovementEntries::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(StockRecords::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PartLots::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PartLots {
        Table,
        LotId,
        PartId,
        ReceivedAt,
        UnitCost,
        ReceivedQuantity,
    }

    #[derive(DeriveIden)]
    pub(super) enum StockRecords {
        Table,
        LotId,
        RemainingQuantity,
        Location,
    }

    #[derive(DeriveIden)]
    pub(super) enum MovementEntries {
        Table,
        EntryId,
        LotId,
        OccurredAt,
        Direction,
        Quantity,
        Note,
    }
}

mod m20240301_000003_create_repair_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_repair_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RepairOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RepairOrders::OrderId)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RepairOrders::IsExported)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(RepairOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RepairOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum RepairOrders {
        Table,
        OrderId,
        IsExported,
        CreatedAt,
    }
}

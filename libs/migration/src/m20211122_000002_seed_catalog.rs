use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            INSERT INTO categories (category_id, category_name, category_status)
            VALUES
                (1, 'Mobile', 1),
                (2, 'Tablet', 1),
                (3, 'Smart Watch', 1),
                (4, 'Laptop', 1)
            ON CONFLICT (category_id) DO NOTHING
            "#,
        )
        .await?;

        db.execute_unprepared(r#"
            INSERT INTO products (
                product_id, product_name, unit_price, unit_in_stock,
                product_picture, category_id, created_date, modified_date
            )
            VALUES
                (
                    1, 'iPhone 13 Pro Max', 55000, 3,
                    'https://www.mxphone.com/wp-content/uploads/2021/04/41117-79579-210401-iPhone12ProMax-xl-1200x675.jpg',
                    1, '2021-11-22T00:00:00Z', '2021-11-22T00:00:00Z'
                ),
                (
                    2, 'iPad Pro 2021', 18500, 10,
                    'https://cdn.siamphone.com/spec/apple/images/ipad_pro_12.9%E2%80%91inch/com_1.jpg',
                    2, '2021-11-22T00:00:00Z', '2021-11-22T00:00:00Z'
                ),
                (
                    3, 'Airpods Pro', 12000, 5,
                    'https://www.avtechguide.com/wp-content/uploads/2020/11/leaked-apple-airpods-pro-generation2-info_01-800x445.jpg',
                    3, '2021-11-22T00:00:00Z', '2021-11-22T00:00:00Z'
                ),
                (
                    4, 'Macbook Pro M1', 45000, 10,
                    'https://cdn.mos.cms.futurecdn.net/iYCQTPgBSdDmkYESfPkunh.jpg',
                    4, '2021-11-22T00:00:00Z', '2021-11-22T00:00:00Z'
                )
            ON CONFLICT (product_id) DO NOTHING
            "#)
        .await?;

        // Explicit ids bypass the serial sequences
        db.execute_unprepared(
            r#"
            SELECT setval(pg_get_serial_sequence('categories', 'category_id'),
                          (SELECT COALESCE(MAX(category_id), 1) FROM categories));
            SELECT setval(pg_get_serial_sequence('products', 'product_id'),
                          (SELECT COALESCE(MAX(product_id), 1) FROM products));
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DELETE FROM products WHERE product_id IN (1, 2, 3, 4);
                DELETE FROM categories WHERE category_id IN (1, 2, 3, 4);
                "#,
            )
            .await?;

        Ok(())
    }
}

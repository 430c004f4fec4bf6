//! FILENAME: tests/common/mod.rs
//! Fixtures for axis-engine integration tests: a FoodMart-style catalog and
//! the Sales queries used against it.

#![allow(dead_code)]

use axis_engine::{InMemoryCatalog, Level, MemberCatalog, QueryModel, TransformOptions};

/// The FoodMart Sales cube, trimmed to the members the tests touch.
pub struct FoodMart;

impl FoodMart {
    pub const PROMOTION_MEDIA: [&'static str; 14] = [
        "Bulk Mail",
        "Cash Register Handout",
        "Daily Paper",
        "Daily Paper, Radio",
        "Daily Paper, Radio, TV",
        "In-Store Coupon",
        "No Media",
        "Product Attachment",
        "Radio",
        "Street Handout",
        "Sunday Paper",
        "Sunday Paper, Radio",
        "Sunday Paper, Radio, TV",
        "TV",
    ];

    pub fn catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();

        catalog.add_hierarchy("Measures", &["MeasuresLevel"]);
        for measure in ["Unit Sales", "Store Cost", "Store Sales"] {
            catalog.add_member("Measures", None, measure).unwrap();
        }

        catalog.add_hierarchy("Promotion Media", &["(All)", "Media Type"]);
        let all = catalog
            .add_member("Promotion Media", None, "All Media")
            .unwrap();
        for media in Self::PROMOTION_MEDIA {
            catalog
                .add_member("Promotion Media", Some(&all), media)
                .unwrap();
        }

        catalog.add_hierarchy(
            "Product",
            &[
                "(All)",
                "Product Family",
                "Product Department",
                "Product Category",
            ],
        );
        let all = catalog.add_member("Product", None, "All Products").unwrap();
        let drink = catalog.add_member("Product", Some(&all), "Drink").unwrap();
        let food = catalog.add_member("Product", Some(&all), "Food").unwrap();
        let non_consumable = catalog
            .add_member("Product", Some(&all), "Non-Consumable")
            .unwrap();

        let alcoholic = catalog
            .add_member("Product", Some(&drink), "Alcoholic Beverages")
            .unwrap();
        let beverages = catalog
            .add_member("Product", Some(&drink), "Beverages")
            .unwrap();
        catalog.add_member("Product", Some(&drink), "Dairy").unwrap();
        let baking = catalog
            .add_member("Product", Some(&food), "Baking Goods")
            .unwrap();
        catalog.add_member("Product", Some(&food), "Produce").unwrap();
        let household = catalog
            .add_member("Product", Some(&non_consumable), "Household")
            .unwrap();

        catalog
            .add_member("Product", Some(&alcoholic), "Beer and Wine")
            .unwrap();
        for category in [
            "Carbonated Beverages",
            "Drinks",
            "Hot Beverages",
            "Pure Juice Beverages",
        ] {
            catalog
                .add_member("Product", Some(&beverages), category)
                .unwrap();
        }
        catalog
            .add_member("Product", Some(&baking), "Baking Goods")
            .unwrap();
        catalog
            .add_member("Product", Some(&household), "Cleaning Supplies")
            .unwrap();

        catalog.add_hierarchy("Gender", &["(All)", "Gender"]);
        let all = catalog.add_member("Gender", None, "All Gender").unwrap();
        catalog.add_member("Gender", Some(&all), "F").unwrap();
        catalog.add_member("Gender", Some(&all), "M").unwrap();

        catalog.add_hierarchy(
            "Store",
            &["(All)", "Store Country", "Store State", "Store City"],
        );
        let all = catalog.add_member("Store", None, "All Stores").unwrap();
        catalog.add_member("Store", Some(&all), "Canada").unwrap();
        catalog.add_member("Store", Some(&all), "Mexico").unwrap();
        let usa = catalog.add_member("Store", Some(&all), "USA").unwrap();
        catalog.add_member("Store", Some(&usa), "CA").unwrap();
        catalog.add_member("Store", Some(&usa), "OR").unwrap();
        catalog.add_member("Store", Some(&usa), "WA").unwrap();

        catalog
    }

    /// Looks up a level by hierarchy and depth.
    pub fn level(catalog: &InMemoryCatalog, hierarchy: &str, depth: usize) -> Level {
        catalog.levels_of(hierarchy).unwrap()[depth].clone()
    }

    pub fn named_level(catalog: &InMemoryCatalog, hierarchy: &str, name: &str) -> Level {
        catalog.level(hierarchy, name).unwrap()
    }
}

/// Sales queries in the shape a pivot UI produces.
pub struct SalesQueries;

impl SalesQueries {
    pub const COLUMNS: &'static str =
        "{[Measures].[Unit Sales], [Measures].[Store Cost], [Measures].[Store Sales]} ON COLUMNS";

    /// Promotion Media total crossed with Product drilled down through
    /// Drink and Beverages.
    pub const DRILLED_ROWS: &'static str = "select {[Measures].[Unit Sales], [Measures].[Store Cost], [Measures].[Store Sales]} ON COLUMNS, \
        Hierarchize(Union(Union(Union(Crossjoin({[Promotion Media].[All Media]}, {[Product].[All Products]}), \
        Crossjoin({[Promotion Media].[All Media]}, [Product].[All Products].Children)), Crossjoin({[Promotion Media].[All Media]}, \
        [Product].[Drink].Children)), Crossjoin({[Promotion Media].[All Media]}, [Product].[Drink].[Beverages].Children))) ON ROWS \
        from [Sales] where [Time].[1997]";

    /// Product by Gender written as a union of tuples and crossjoins.
    pub const TUPLE_ROWS: &'static str = "SELECT {[Measures].[Unit Sales]} ON COLUMNS, Union(Union({([Product].[All Products], [Gender].[All Gender])}, \
        Union(Union(CrossJoin({[Product].[Food]}, {[Gender].[All Gender]}), CrossJoin({[Product].[Food]}, {[Gender].[F]})), \
        CrossJoin({[Product].[Food]}, {[Gender].[M]}))), Union(Union(CrossJoin({[Product].[Non-Consumable]}, \
        {[Gender].[All Gender]}), CrossJoin({[Product].[Non-Consumable]}, {[Gender].[F]})), \
        CrossJoin({[Product].[Non-Consumable]}, {[Gender].[M]}))) ON ROWS FROM [Sales]";

    /// The Product selection of `DRILLED_ROWS` once normalized.
    pub const DRILLED_PRODUCTS: &'static str = "{[Product].[All Products], [Product].[All Products].[Drink], \
        [Product].[All Products].[Drink].[Alcoholic Beverages], [Product].[All Products].[Drink].[Beverages], \
        [Product].[All Products].[Drink].[Beverages].[Carbonated Beverages], [Product].[All Products].[Drink].[Beverages].[Drinks], \
        [Product].[All Products].[Drink].[Beverages].[Hot Beverages], [Product].[All Products].[Drink].[Beverages].[Pure Juice Beverages], \
        [Product].[All Products].[Drink].[Dairy], [Product].[All Products].[Food], [Product].[All Products].[Non-Consumable]}";

    pub fn model(catalog: &InMemoryCatalog, text: &str, options: &TransformOptions) -> QueryModel {
        QueryModel::parse(text, catalog, options).unwrap()
    }

    /// Wraps a rows expression into the full drilled-rows statement text.
    pub fn with_rows(rows: &str) -> String {
        format!(
            "SELECT {}, {} ON ROWS FROM [Sales] WHERE [Time].[1997]",
            Self::COLUMNS,
            rows
        )
    }
}

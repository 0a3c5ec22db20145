//! Sample catalog used by demos, the CLI and tests.

use crate::catalog::memory::stamp_in_order;
use crate::catalog::{CatalogData, Category, InMemoryCatalog, Product, ProductVariant};
use crate::money::Money;

const IMAGE_PARAMS: &str = "?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80";

fn unsplash(photo: &str) -> String {
    format!("https://images.unsplash.com/photo-{photo}{IMAGE_PARAMS}")
}

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    price: i64,
    sale_price: Option<i64>,
    photo: &'static str,
    category: &'static str,
    flags: (bool, bool, bool),
    stock: u32,
    material: &'static str,
    dimensions: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "p1",
        name: "Minimalist Ceramic Vase",
        description: "A beautiful handcrafted ceramic vase with a minimalist design. Perfect for any modern home.",
        price: 4999,
        sale_price: None,
        photo: "1612196808214-b40b3db631b5",
        category: "decor",
        flags: (true, true, false),
        stock: 15,
        material: "Ceramic",
        dimensions: "H: 25cm, W: 12cm",
    },
    Seed {
        id: "p2",
        name: "Modern Lounge Chair",
        description: "Comfortable and stylish lounge chair with wooden legs and soft fabric upholstery.",
        price: 29999,
        sale_price: None,
        photo: "1598300042247-d088f8ab3a91",
        category: "furniture",
        flags: (true, false, false),
        stock: 8,
        material: "Wood, Polyester",
        dimensions: "H: 80cm, W: 65cm, D: 70cm",
    },
    Seed {
        id: "p3",
        name: "Handwoven Wool Rug",
        description: "Soft and durable handwoven wool rug with a geometric pattern. Adds warmth to any room.",
        price: 19999,
        sale_price: Some(15999),
        photo: "1600166898405-da9535204843",
        category: "textiles",
        flags: (false, false, true),
        stock: 12,
        material: "Wool",
        dimensions: "200cm x 150cm",
    },
    Seed {
        id: "p4",
        name: "Marble Coffee Table",
        description: "Elegant coffee table with a marble top and metal base. A statement piece for your living room.",
        price: 44999,
        sale_price: None,
        photo: "1577140917170-285929fb55b7",
        category: "furniture",
        flags: (true, false, false),
        stock: 5,
        material: "Marble, Stainless Steel",
        dimensions: "H: 45cm, Diameter: 90cm",
    },
    Seed {
        id: "p5",
        name: "Copper Pendant Light",
        description: "Modern copper pendant light that adds a warm glow to any space. Perfect for dining areas.",
        price: 12999,
        sale_price: None,
        photo: "1507473885765-e6ed057f782c",
        category: "decor",
        flags: (false, true, false),
        stock: 20,
        material: "Copper, Brass",
        dimensions: "H: 35cm, Diameter: 25cm",
    },
    Seed {
        id: "p6",
        name: "Linen Bed Sheets",
        description: "Luxurious 100% linen bed sheets that get softer with every wash. Available in various colors.",
        price: 8999,
        sale_price: Some(6999),
        photo: "1522771739844-6a9f6d5f14af",
        category: "textiles",
        flags: (false, false, true),
        stock: 25,
        material: "Linen",
        dimensions: "King Size",
    },
    Seed {
        id: "p7",
        name: "Wooden Dining Table",
        description: "Solid oak dining table with a natural finish. Seats up to 6 people comfortably.",
        price: 59999,
        sale_price: None,
        photo: "1615066390971-03e4e1c36ddf",
        category: "furniture",
        flags: (true, false, false),
        stock: 3,
        material: "Oak",
        dimensions: "L: 180cm, W: 90cm, H: 75cm",
    },
    Seed {
        id: "p8",
        name: "Ceramic Dinner Set",
        description: "Complete dinner set for 4 people. Includes plates, bowls, and mugs in a modern design.",
        price: 11999,
        sale_price: None,
        photo: "1603199506016-b9a594b593c0",
        category: "kitchen",
        flags: (false, true, false),
        stock: 10,
        material: "Ceramic",
        dimensions: "Various",
    },
    Seed {
        id: "p9",
        name: "Glass Terrarium",
        description: "Geometric glass terrarium for displaying small plants and creating a mini garden indoors.",
        price: 3999,
        sale_price: None,
        photo: "1485955900006-10f4d324d411",
        category: "decor",
        flags: (true, false, false),
        stock: 18,
        material: "Glass, Brass",
        dimensions: "H: 20cm, W: 15cm, D: 15cm",
    },
    Seed {
        id: "p10",
        name: "Velvet Cushion Covers",
        description: "Soft velvet cushion covers that add texture and comfort to your sofa or bed.",
        price: 2499,
        sale_price: None,
        photo: "1579656381226-5fc0f0100c3b",
        category: "textiles",
        flags: (false, true, false),
        stock: 30,
        material: "Velvet",
        dimensions: "50cm x 50cm",
    },
    Seed {
        id: "p11",
        name: "Wooden Bookshelf",
        description: "Versatile bookshelf with a mix of open and closed storage. Perfect for organizing your books and decor.",
        price: 34999,
        sale_price: Some(29999),
        photo: "1594620302200-9a762244a156",
        category: "furniture",
        flags: (false, false, true),
        stock: 7,
        material: "Oak Veneer, MDF",
        dimensions: "H: 180cm, W: 120cm, D: 35cm",
    },
    Seed {
        id: "p12",
        name: "Stainless Steel Cookware Set",
        description: "Professional-grade stainless steel cookware set including pots and pans of various sizes.",
        price: 24999,
        sale_price: None,
        photo: "1584990347449-a5d9f800a783",
        category: "kitchen",
        flags: (true, false, false),
        stock: 9,
        material: "Stainless Steel",
        dimensions: "Various",
    },
];

/// The four storefront categories. Slugs match ids so category pages live
/// at `/category/<id>`.
pub fn sample_categories() -> Vec<Category> {
    [
        ("decor", "Home Decor", "Beautiful accessories to enhance your home", "1586023492125-27b2c045efd7"),
        ("furniture", "Furniture", "Stylish and functional furniture for every room", "1538688525198-9b88f6f53126"),
        ("textiles", "Textiles", "Soft fabrics to add comfort and style", "1620799140408-edc6dcb6d633"),
        ("kitchen", "Kitchen", "Essential tools for cooking and dining", "1600585152220-90363fe7e115"),
    ]
    .into_iter()
    .map(|(id, name, description, photo)| {
        let mut category = Category::new(id, name, unsplash(photo)).with_description(description);
        category.slug = id.to_string();
        category
    })
    .collect()
}

/// Twelve published products, oldest first.
pub fn sample_products() -> Vec<Product> {
    let mut products: Vec<Product> = SEEDS.iter().map(seed_product).collect();
    stamp_in_order(&mut products);
    products
}

/// A catalog holding [`sample_categories`] and [`sample_products`].
pub fn sample_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_data(CatalogData {
        categories: sample_categories(),
        products: sample_products(),
    })
}

fn seed_product(seed: &Seed) -> Product {
    let mut variant = ProductVariant::new(format!("{}-1", seed.id), Money::usd(seed.price))
        .with_stock(seed.stock)
        .with_image(unsplash(seed.photo))
        .with_option("material", seed.material)
        .with_option("dimensions", seed.dimensions);
    if let Some(sale) = seed.sale_price {
        variant = variant.with_sale_price(Money::usd(sale));
    }

    let mut product = Product::new(seed.id, seed.name, seed.category)
        .with_description(seed.description)
        .with_variant(variant);
    let (featured, new_arrival, sale) = seed.flags;
    product.featured = featured;
    product.new_arrival = new_arrival;
    product.sale = sale;
    for material in seed.material.split(", ") {
        product.add_tag(material.to_lowercase());
    }
    product
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ProductSource;

    #[test]
    fn test_sample_catalog_shape() {
        let catalog = sample_catalog();
        assert_eq!(catalog.product_count(), 12);
        assert_eq!(catalog.categories().len(), 4);

        let rug = catalog.get_by_slug("handwoven-wool-rug").unwrap();
        assert_eq!(rug.effective_price(), Some(Money::usd(15999)));
        assert_eq!(rug.stock(), 12);
        assert!(rug.primary_image().unwrap().starts_with("https://images.unsplash.com/"));
    }

    #[test]
    fn test_every_product_has_a_known_category() {
        let catalog = sample_catalog();
        for product in sample_products() {
            assert!(catalog.category(&product.category_id).is_some(), "{}", product.id);
        }
    }

    #[test]
    fn test_products_are_stamped_oldest_first() {
        let products = sample_products();
        assert!(products.windows(2).all(|w| w[0].created_at < w[1].created_at));
    }
}

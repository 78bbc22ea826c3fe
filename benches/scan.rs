//! This bench measures queries that scan and parse every recipe file in a
//! moderately sized store.

#![allow(missing_docs)]

use cocktails::{Directory, Ingredient, NewRecipe};
use criterion::{Criterion, criterion_group, criterion_main};
use tempfile::TempDir;

const GLASSES: [&str; 4] = ["Highball", "Coupe", "Rocks", "Martini"];
const SPIRITS: [&str; 5] = ["Gin", "White Rum", "Bourbon", "Tequila", "Vodka"];

/// Fills a store with generated recipes
fn preseed_directory(dir: &Directory) {
    for i in 0..500 {
        let recipe = NewRecipe {
            name: format!("Recipe {i:03}"),
            ingredients: [SPIRITS[i % SPIRITS.len()], "Lime", "Sugar Syrup"]
                .into_iter()
                .map(|name| Ingredient {
                    name: name.to_string(),
                    amount: 25.0,
                    unit: "ml".to_string(),
                })
                .collect(),
            instructions: vec!["Shake with ice".to_string(), "Strain".to_string()],
            glass_type: GLASSES[i % GLASSES.len()].to_string(),
            category: "Generated".to_string(),
        };
        dir.add(recipe).unwrap();
    }
}

fn scan(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let dir = Directory::open(tmp.path().to_path_buf()).unwrap();
    preseed_directory(&dir);

    c.bench_function("find by ingredient", |b| {
        b.iter(|| dir.find_by_ingredient("rum").unwrap());
    });

    c.bench_function("find by all ingredients", |b| {
        b.iter(|| dir.find_by_all_ingredients("gin,lime").unwrap());
    });

    c.bench_function("list ingredients", |b| {
        b.iter(|| dir.list_ingredients().unwrap());
    });

    c.bench_function("get last recipe", |b| {
        b.iter(|| dir.get("recipe 499").unwrap());
    });
}

criterion_group!(benches, scan);
criterion_main!(benches);

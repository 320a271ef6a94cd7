use facetq::prelude::*;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let catalog = args.next().expect("Usage: cli <catalog.json> <query-string>");
    let query = args.collect::<Vec<_>>().join("&");
    println!("Input: '{query}'");

    let catalog = std::fs::read_to_string(catalog).expect("Failed to read catalog");
    let catalog = Catalog::from_json(&catalog).expect("Failed to load catalog");

    let (model, diagnostics) = Codec::default().decode_with_diagnostics(&query, &catalog);
    for diagnostic in &diagnostics {
        println!("Warning: {diagnostic}");
    }

    let json = serde_json::to_string_pretty(&model).expect("Failed to serialize model");
    println!("\nModel:\n{json}");
    println!("\nQuery:\n{}", compile(&model));
    println!("\nURL:\n?{}", encode(&model));
}

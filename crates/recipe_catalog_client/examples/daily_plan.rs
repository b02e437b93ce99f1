use recipe_catalog_client::{RecipeCatalog, config::Config, http_client::ReqwestCatalogClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects SPOONACULAR_API_KEY in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestCatalogClient::from_config(&cfg)?;
    let meals = client.fetch_daily_plan(2000.0).await?;
    for meal in &meals {
        let detail = client.fetch_recipe_detail(meal.id).await?;
        let calories = detail
            .nutrition
            .iter()
            .flat_map(|n| n.nutrients.iter())
            .find(|n| n.name == "Calories")
            .map(|n| n.amount)
            .unwrap_or_default();
        println!("{} ({}): {:.0} kcal", meal.title, meal.id, calories);
    }
    Ok(())
}

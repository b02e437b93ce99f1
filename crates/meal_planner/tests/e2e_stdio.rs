use rmcp::ServiceExt;
use rmcp::transport::TokioChildProcess;
use std::process::Stdio;
use tokio::process::Command;

use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn detail(id: u64, macros: [f64; 4]) -> serde_json::Value {
    let [calories, protein, carbs, fat] = macros;
    serde_json::json!({
        "id": id,
        "servings": 1,
        "extendedIngredients": [],
        "nutrition": {"nutrients": [
            {"name": "Calories", "amount": calories},
            {"name": "Protein", "amount": protein},
            {"name": "Carbohydrates", "amount": carbs},
            {"name": "Fat", "amount": fat}
        ]}
    })
}

#[tokio::test]
async fn e2e_stdio_lists_tools_and_generates_plan() {
    // Mock recipe catalog
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mealplanner/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "meals": [
                {"id": 1, "title": "Cinnamon Oat Porridge"},
                {"id": 2, "title": "Falafel Wrap"},
                {"id": 3, "title": "Chicken Tikka Curry"}
            ]
        })))
        .mount(&mock)
        .await;
    for (id, macros) in [
        (1, [380.0, 14.0, 60.0, 9.0]),
        (2, [620.0, 24.0, 75.0, 24.0]),
        (3, [750.0, 58.0, 40.0, 32.0]),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/recipes/{id}/information")))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail(id, macros)))
            .mount(&mock)
            .await;
    }

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_meal_planner"));
    cmd.env("SPOONACULAR_BASE_URL", mock.uri());
    cmd.env("SPOONACULAR_API_KEY", "tok");
    cmd.env("MEAL_PLANNER_LOG_LEVEL", "debug");

    // piped stderr so server logs can be shown on failure
    let (child, mut stderr_opt) = TokioChildProcess::builder(cmd)
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn child");
    let service = match ().serve(child).await {
        Ok(s) => s,
        Err(e) => {
            if let Some(ref mut stderr) = stderr_opt {
                use tokio::io::AsyncReadExt;
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                eprintln!("child stderr:\n{}", buf);
            }
            panic!("serve failed: {e}");
        }
    };

    let tools = service
        .list_tools(Default::default())
        .await
        .expect("list tools");
    let names: Vec<_> = tools
        .tools
        .into_iter()
        .map(|t| t.name.to_string())
        .collect();
    for expected in [
        "generate_meal_plan",
        "get_generated_meals",
        "save_meal_history",
        "get_meal_history",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing tool {expected}");
    }

    let args = serde_json::json!({
        "calorieGoal": 1750,
        "proteinGoal": 96,
        "carbGoal": 175,
        "fatGoal": 65,
        "uid": "u1"
    });
    let res = service
        .call_tool({
            let mut params = rmcp::model::CallToolRequestParams::new("generate_meal_plan");
            params.arguments = args.as_object().cloned();
            params
        })
        .await
        .expect("call_tool");
    let plan = res.structured_content.expect("structured plan");
    let slots: Vec<(&str, u64)> = plan["meals"]
        .as_array()
        .expect("meals")
        .iter()
        .map(|m| {
            (
                m["mealType"].as_str().unwrap_or_default(),
                m["id"].as_u64().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(slots, vec![("breakfast", 1), ("lunch", 2), ("dinner", 3)]);
    assert_eq!(plan["totalMacros"]["calories"], 1750.0);

    let res = service
        .call_tool({
            let mut params = rmcp::model::CallToolRequestParams::new("get_generated_meals");
            params.arguments = serde_json::json!({"uid": "u1"}).as_object().cloned();
            params
        })
        .await
        .expect("call_tool");
    let stored = res.structured_content.expect("stored plan");
    assert_eq!(stored["meals"], plan["meals"]);

    service.cancel().await.expect("cancel");
}

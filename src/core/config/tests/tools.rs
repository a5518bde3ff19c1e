use crate::core::config::{AppConfig, ConfigError, ToolDefinition, is_valid_tool_id};

#[test]
fn tool_ids_must_be_function_names() {
    assert!(is_valid_tool_id("get_time"));
    assert!(is_valid_tool_id("_private2"));
    assert!(!is_valid_tool_id("2fast"));
    assert!(!is_valid_tool_id("my-tool"));
    assert!(!is_valid_tool_id("has space"));
    assert!(!is_valid_tool_id(""));
}

#[test]
fn add_tool_validates_id_and_uniqueness() {
    let mut config = AppConfig::default();
    config
        .add_tool(ToolDefinition::custom("get_time", "Clock", "Returns current time"))
        .unwrap();
    assert!(config.tool("get_time").unwrap().is_custom);

    assert!(matches!(
        config.add_tool(ToolDefinition::custom("get-time", "Clock", "")),
        Err(ConfigError::InvalidToolId(_))
    ));
    assert!(matches!(
        config.add_tool(ToolDefinition::custom("get_time", "Clock", "")),
        Err(ConfigError::DuplicateTool(_))
    ));
}

#[test]
fn deleting_a_tool_removes_it_from_every_solution() {
    let mut config = AppConfig::default();
    config
        .set_solution_tools("simple_workflow", vec!["duckduckgo".into()])
        .unwrap();
    config.delete_tool("duckduckgo").unwrap();

    assert!(config.tool("duckduckgo").is_none());
    for solution in &config.solutions {
        assert!(
            !solution.enabled_tool_ids.iter().any(|t| t == "duckduckgo"),
            "{} still references the deleted tool",
            solution.id
        );
    }
    assert!(matches!(
        config.delete_tool("duckduckgo"),
        Err(ConfigError::UnknownTool(_))
    ));
}

#[test]
fn solution_tools_must_exist_in_registry() {
    let mut config = AppConfig::default();
    assert!(matches!(
        config.set_solution_tools("default_multi", vec!["calculator".into(), "teleport".into()]),
        Err(ConfigError::UnknownTool(id)) if id == "teleport"
    ));
    config
        .set_solution_tools(
            "default_multi",
            vec!["weather".into(), "weather".into(), "calculator".into()],
        )
        .unwrap();
    assert_eq!(
        config.solution("default_multi").unwrap().enabled_tool_ids,
        vec!["weather", "calculator"]
    );
}

#[test]
fn tool_toggles_and_keys() {
    let mut config = AppConfig::default();
    config.set_tool_enabled("weather", true).unwrap();
    config
        .set_tool_api_key("weather", Some("owm-123".into()))
        .unwrap();
    let weather = config.tool("weather").unwrap();
    assert!(weather.enabled && weather.requires_key);
    assert_eq!(weather.api_key.as_deref(), Some("owm-123"));

    config.set_tool_api_key("weather", Some("  ".into())).unwrap();
    assert!(config.tool("weather").unwrap().api_key.is_none());
    assert!(config.set_tool_enabled("nope", true).is_err());
}

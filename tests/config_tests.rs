// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use prompter::config::{Limits, ModelConfig, DEFAULT_TEMPERATURE, DEFAULT_TOP_P};
use prompter::llm::Provider;

#[test]
fn test_default_config_is_gemini_flash() {
    let config = ModelConfig::default();
    assert_eq!(config.provider, Provider::GoogleGemini);
    assert_eq!(config.model, "gemini-2.5-flash");
    assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
    assert_eq!(config.top_p, DEFAULT_TOP_P);
}

#[test]
fn test_meta_config_pins_model_and_top_p() {
    let config = ModelConfig::meta(Provider::OpenRouter, 0.6);
    assert_eq!(config.model, "anthropic/claude-3.5-sonnet");
    assert_eq!(config.temperature, 0.6);
    assert_eq!(config.top_p, DEFAULT_TOP_P);
}

#[test]
fn test_validate_rejects_out_of_range_sampling() {
    let mut config = ModelConfig::default();
    config.temperature = 2.5;
    assert!(config.validate().is_err());

    config.temperature = 2.0;
    config.top_p = 1.2;
    assert!(config.validate().is_err());

    config.top_p = 1.0;
    assert!(config.validate().is_ok());
}

// Environment mutation is process-global; keep it confined to one test so
// parallel execution cannot interleave with another reader of these names.
#[test]
fn test_limits_env_overrides_and_fallbacks() {
    let defaults = Limits::default();
    assert_eq!(defaults.max_prompt_length, 10_000);
    assert_eq!(defaults.max_blocks, 20);
    assert_eq!(defaults.rate_limit_window_secs, 60);
    assert_eq!(defaults.rate_limit_max_requests, 10);

    std::env::set_var("PROMPTER_MAX_BLOCKS", "5");
    std::env::set_var("PROMPTER_MAX_PROMPT_LENGTH", "not-a-number");

    let limits = Limits::from_env();
    assert_eq!(limits.max_blocks, 5);
    // Unparsable values fall back instead of failing
    assert_eq!(limits.max_prompt_length, 10_000);

    std::env::remove_var("PROMPTER_MAX_BLOCKS");
    std::env::remove_var("PROMPTER_MAX_PROMPT_LENGTH");
}

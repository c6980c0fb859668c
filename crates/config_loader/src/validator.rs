//! 配置校验模块
//!
//! 校验规则：
//! - 字段约束 (validator derive)
//! - sink 名称唯一
//! - 所有级别名称可识别 (严格匹配小写)
//! - file sink 必须提供 path

use std::collections::HashSet;

use validator::{Validate, ValidationErrors};

use contracts::{ContractError, LevelSetting, LoggingConfig, Severity, SinkType};

/// 校验 LoggingConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &LoggingConfig) -> Result<(), ContractError> {
    config.validate().map_err(field_error)?;
    validate_levels(config)?;
    validate_sink_names(config)?;
    validate_sink_params(config)?;
    Ok(())
}

/// 把 validator 的错误压成单个字段错误
fn field_error(errors: ValidationErrors) -> ContractError {
    let message = errors.to_string();
    let field = message
        .split(':')
        .next()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or("config")
        .to_string();
    ContractError::config_validation(field, message)
}

fn check_level(field: String, name: &str) -> Result<(), ContractError> {
    Severity::from_name(name).map(|_| ()).ok_or_else(|| {
        ContractError::config_validation(
            field,
            format!("unrecognized level name '{name}' (expected debug, info, warning or error)"),
        )
    })
}

/// 校验级别名称
fn validate_levels(config: &LoggingConfig) -> Result<(), ContractError> {
    if let LevelSetting::Name(name) = &config.min_level {
        check_level("min_level".to_string(), name)?;
    }
    check_level("console_min_level".to_string(), &config.console_min_level)?;
    for (idx, sink) in config.sinks.iter().enumerate() {
        check_level(format!("sinks[{idx}].min_level"), &sink.min_level)?;
    }
    Ok(())
}

/// 校验 sink 名称唯一性
fn validate_sink_names(config: &LoggingConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for sink in &config.sinks {
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

/// 校验 sink 类型特定参数
fn validate_sink_params(config: &LoggingConfig) -> Result<(), ContractError> {
    for (idx, sink) in config.sinks.iter().enumerate() {
        if sink.sink_type == SinkType::File
            && sink.params.get("path").map_or(true, |p| p.is_empty())
        {
            return Err(ContractError::config_validation(
                format!("sinks[{idx}].params.path"),
                "file sink requires a non-empty 'path' parameter",
            ));
        }
    }
    Ok(())
}

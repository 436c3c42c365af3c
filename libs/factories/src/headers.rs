//! Header-driven optional fields.
//!
//! Each rule reads one header and, when the value parses, fills one field.
//! Rules run independently: a missing or malformed header leaves its own field
//! unset and never affects the others.

use sonde_id::CorrelationId;

use crate::RequestInfo;

pub const APPLICATION_ID_HEADER: &str = "X-CF-ApplicationID";
pub const INSTANCE_INDEX_HEADER: &str = "X-CF-InstanceIndex";
pub const INSTANCE_ID_HEADER: &str = "X-CF-InstanceID";
pub const USER_AGENT_HEADER: &str = "User-Agent";

/// Optional event fields sourced from request headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    pub application_id: Option<CorrelationId>,
    pub instance_index: Option<i32>,
    pub instance_id: Option<String>,
    pub user_agent: Option<String>,
}

struct HeaderRule {
    header: &'static str,
    apply: fn(&mut HeaderFields, &str) -> Result<(), String>,
}

const RULES: [HeaderRule; 4] = [
    HeaderRule {
        header: APPLICATION_ID_HEADER,
        apply: set_application_id,
    },
    HeaderRule {
        header: INSTANCE_INDEX_HEADER,
        apply: set_instance_index,
    },
    HeaderRule {
        header: INSTANCE_ID_HEADER,
        apply: set_instance_id,
    },
    HeaderRule {
        header: USER_AGENT_HEADER,
        apply: set_user_agent,
    },
];

fn set_application_id(fields: &mut HeaderFields, value: &str) -> Result<(), String> {
    let id = CorrelationId::parse(value).map_err(|e| {
        if e.is_empty() {
            "empty value".to_string()
        } else {
            e.to_string()
        }
    })?;
    fields.application_id = Some(id);
    Ok(())
}

fn set_instance_index(fields: &mut HeaderFields, value: &str) -> Result<(), String> {
    let index = value.parse::<i32>().map_err(|e| e.to_string())?;
    fields.instance_index = Some(index);
    Ok(())
}

fn set_instance_id(fields: &mut HeaderFields, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("empty value".to_string());
    }
    fields.instance_id = Some(value.to_string());
    Ok(())
}

fn set_user_agent(fields: &mut HeaderFields, value: &str) -> Result<(), String> {
    fields.user_agent = Some(value.to_string());
    Ok(())
}

impl HeaderFields {
    /// Applies every header rule to the request.
    pub fn extract(request: &(impl RequestInfo + ?Sized)) -> Self {
        let mut fields = Self::default();
        for rule in &RULES {
            let Some(value) = request.header(rule.header) else {
                continue;
            };
            if let Err(reason) = (rule.apply)(&mut fields, &value) {
                tracing::debug!(
                    header = rule.header,
                    value = %value,
                    reason = %reason,
                    "ignoring malformed header"
                );
            }
        }
        fields
    }
}

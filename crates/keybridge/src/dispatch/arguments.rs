//! Typed access to the arguments of a validated request.

use serde_json::Value;

use super::DispatchError;
use crate::whitelist::{Action, ValidatedRequest};

pub(super) struct Arguments<'r> {
    action: Action,
    request: &'r ValidatedRequest,
}

impl<'r> Arguments<'r> {
    pub(super) const fn new(request: &'r ValidatedRequest) -> Self {
        Self {
            action: request.action(),
            request,
        }
    }

    fn positional(&self, index: usize) -> Result<&'r Value, DispatchError> {
        self.request.args().get(index).ok_or_else(|| {
            DispatchError::invalid_argument(self.action, format!("missing argument {index}"))
        })
    }

    pub(super) fn string(&self, index: usize) -> Result<&'r str, DispatchError> {
        self.positional(index)?.as_str().ok_or_else(|| {
            DispatchError::invalid_argument(self.action, format!("argument {index} is not a string"))
        })
    }

    pub(super) fn boolean(&self, index: usize) -> Result<bool, DispatchError> {
        self.positional(index)?.as_bool().ok_or_else(|| {
            DispatchError::invalid_argument(self.action, format!("argument {index} is not a boolean"))
        })
    }

    pub(super) fn keyword_bool(&self, name: &str, default: bool) -> Result<bool, DispatchError> {
        self.request.kwargs().get(name).map_or(Ok(default), |value| {
            value.as_bool().ok_or_else(|| {
                DispatchError::invalid_argument(self.action, format!("{name} is not a boolean"))
            })
        })
    }

    pub(super) fn keyword_string(&self, name: &str) -> Result<Option<String>, DispatchError> {
        match self.request.kwargs().get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(_) => Err(DispatchError::invalid_argument(
                self.action,
                format!("{name} is not a string"),
            )),
        }
    }

    pub(super) fn keyword_strings(&self, name: &str) -> Result<Vec<String>, DispatchError> {
        let Some(value) = self.request.kwargs().get(name) else {
            return Ok(Vec::new());
        };
        let items = value.as_array().ok_or_else(|| {
            DispatchError::invalid_argument(self.action, format!("{name} is not a list"))
        })?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str().map(str::to_owned).ok_or_else(|| {
                    DispatchError::invalid_argument(
                        self.action,
                        format!("/kwargs/{name}/{index} must be a string, found {item}"),
                    )
                })
            })
            .collect()
    }
}

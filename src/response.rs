//! Validation of the status payload and translation into a chat message.
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::model::{Homework, HomeworkStatus};

const HOMEWORKS_KEY: &str = "homeworks";

/// Check the payload shape and pick the most recent submission.
///
/// Returns `Ok(None)` when the list is empty, which is the normal
/// "nothing changed" answer. The API lists newest entries first.
pub fn check_response(payload: &Value) -> Result<Option<Homework>, ApiError> {
    info!("checking API response");
    let object = payload.as_object().ok_or(ApiError::NotAnObject)?;
    let homeworks = object
        .get(HOMEWORKS_KEY)
        .ok_or(ApiError::MissingHomeworks)?
        .as_array()
        .ok_or(ApiError::HomeworksNotAList)?;

    let Some(latest) = homeworks.first() else {
        debug!("no homework updates");
        return Ok(None);
    };

    let homework = Homework::deserialize_entry(latest)?;
    Ok(Some(homework))
}

/// Build the notification text for one submission.
pub fn parse_status(homework: &Homework) -> Result<String, ApiError> {
    let name = homework
        .homework_name
        .as_deref()
        .ok_or(ApiError::MissingField("homework_name"))?;
    let status: HomeworkStatus = homework
        .status
        .as_deref()
        .ok_or(ApiError::MissingField("status"))?
        .parse()?;
    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    ))
}

impl Homework {
    fn deserialize_entry(entry: &Value) -> Result<Self, ApiError> {
        if !entry.is_object() {
            return Err(ApiError::MalformedHomework("entry is not an object".into()));
        }
        Homework::deserialize(entry).map_err(|err| ApiError::MalformedHomework(err.to_string()))
    }
}

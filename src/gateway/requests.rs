use crate::error::RequestError;
use serde::Deserialize;
use serde_json::Value;

/// Method names accepted on the wire.
pub const METHODS: &[&str] = &[
    "executeCommand",
    "executeRootCommand",
    "installPackage",
    "checkRootAccess",
    "changeDirectory",
    "getCurrentDirectory",
    "setupLinuxEnvironment",
    "listDirectory",
    "readFile",
    "writeFile",
    "deleteFile",
    "createDirectory",
    "copyFile",
    "moveFile",
    "downloadFile",
];

/// One inbound request. Every field is optional on the wire; required ones
/// are checked in [`Request`] accessors so a missing value becomes a
/// [`RequestError::MissingField`] rejection instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    ExecuteCommand {
        command: Option<String>,
        #[serde(default)]
        args: Option<Vec<Option<String>>>,
    },
    ExecuteRootCommand {
        command: Option<String>,
        #[serde(default)]
        args: Option<Vec<Option<String>>>,
    },
    InstallPackage {
        package_name: Option<String>,
        source: Option<String>,
    },
    CheckRootAccess,
    ChangeDirectory {
        path: Option<String>,
    },
    GetCurrentDirectory,
    SetupLinuxEnvironment,
    ListDirectory {
        path: Option<String>,
    },
    ReadFile {
        path: Option<String>,
    },
    WriteFile {
        path: Option<String>,
        content: Option<String>,
        append: Option<bool>,
    },
    DeleteFile {
        path: Option<String>,
        recursive: Option<bool>,
    },
    CreateDirectory {
        path: Option<String>,
        recursive: Option<bool>,
    },
    CopyFile {
        source: Option<String>,
        destination: Option<String>,
    },
    MoveFile {
        source: Option<String>,
        destination: Option<String>,
    },
    DownloadFile {
        url: Option<String>,
        destination: Option<String>,
    },
}

impl Request {
    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        let method = value
            .get("method")
            .and_then(Value::as_str)
            .ok_or(RequestError::MissingField("Method is required"))?;
        if !METHODS.contains(&method) {
            return Err(RequestError::UnknownMethod(method.to_string()));
        }
        serde_json::from_value(value).map_err(|e| RequestError::Malformed(e.to_string()))
    }

    pub fn from_line(line: &str) -> Result<Self, RequestError> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| RequestError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }
}

pub(super) fn required(
    value: Option<String>,
    message: &'static str,
) -> Result<String, RequestError> {
    value.ok_or(RequestError::MissingField(message))
}

pub(super) fn required_pair(
    first: Option<String>,
    second: Option<String>,
    message: &'static str,
) -> Result<(String, String), RequestError> {
    match (first, second) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(RequestError::MissingField(message)),
    }
}

/// Absent args mean none; null entries are dropped.
pub(super) fn collect_args(args: Option<Vec<Option<String>>>) -> Vec<String> {
    args.unwrap_or_default().into_iter().flatten().collect()
}

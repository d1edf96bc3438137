//! # Wire Format
//!
//! Request paths and response bodies of the crop CRUD service.
//!
//! ```text
//! GET    /v1/crop/getcrops          → { "crops": [CropRecord, ...] }
//! POST   /v1/crop/createcrop        ← CropPayload   → { "success": true }
//! PUT    /v1/crop/updatecrop/{id}   ← CropPayload   → { "success": true }
//! DELETE /v1/crop/deletecrop/{id}                   → { "success": true }
//!
//! any non-2xx                                       → { "message": "..." }
//! ```

use harvest_core::coerce;
use harvest_core::CropRecord;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const GET_CROPS: &str = "/v1/crop/getcrops";
pub const CREATE_CROP: &str = "/v1/crop/createcrop";
pub const UPDATE_CROP: &str = "/v1/crop/updatecrop";
pub const DELETE_CROP: &str = "/v1/crop/deletecrop";

/// `GET /v1/crop/getcrops` body.
///
/// A missing or `null` list is empty; entries that are not objects are
/// skipped, and every record is normalized on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropsResponse {
    #[serde(default, deserialize_with = "coerce::lenient_list")]
    pub crops: Vec<CropRecord>,
}

/// Body of a create/update/delete response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub message: Option<String>,
}

impl MutationResponse {
    /// Parses a 2xx body; an empty body carries no verdict.
    pub fn parse(body: &str) -> ClientResult<Self> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(body)?)
    }

    /// Create/update require an explicit `success: true`.
    pub fn require_success(self) -> ClientResult<()> {
        match self.success {
            Some(true) => Ok(()),
            _ => Err(ClientError::Rejected(self.message)),
        }
    }

    /// Delete only fails on an explicit `success: false`.
    pub fn reject_failure(self) -> ClientResult<()> {
        match self.success {
            Some(false) => Err(ClientError::Rejected(self.message)),
            _ => Ok(()),
        }
    }
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The service's message from a raw body, if it sent a usable one.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

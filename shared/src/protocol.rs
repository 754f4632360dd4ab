use crate::{AuthSession, LoginRequest, StatsSummary, User, UserPatch};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request can be sent without a session token.
    const PUBLIC: bool = false;
}

// =========================================================
// Request Definitions
// =========================================================

/// Exchange credentials for a session token.
/// The only endpoint reachable without a token.
impl ApiRequest for LoginRequest {
    type Response = AuthSession;
    const PATH: &'static str = "/api/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const PUBLIC: bool = true;
}

/// Fetch the profile of the authenticated user
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = User;
    const PATH: &'static str = "/api/users/me";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// List all users (admin view)
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = Vec<User>;
    const PATH: &'static str = "/api/users";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Partially update the authenticated user's profile
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(flatten)]
    pub patch: UserPatch,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = User;
    const PATH: &'static str = "/api/users/me";
    const METHOD: HttpMethod = HttpMethod::Patch;
}

/// Dashboard statistics summary
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsRequest;

impl ApiRequest for StatsRequest {
    type Response = StatsSummary;
    const PATH: &'static str = "/api/stats";
    const METHOD: HttpMethod = HttpMethod::Get;
}

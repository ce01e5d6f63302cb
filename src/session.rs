pub const USER_ID: &str = "user_id";
pub const CSRF_STATE: &str = "csrf_state";
pub const PKCE_VERIFIER: &str = "pkce_verifier";
pub const RETURN_URL: &str = "return_url";
pub const DRAFT: &str = "quiz_draft";
pub const EDIT_DRAFT: &str = "edit_draft";

/// Browser user agent sent with every request, copied from `edge://version/`.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36 Edg/109.0.1518.61";

pub fn get_user_agent() -> &'static str {
    USER_AGENT
}

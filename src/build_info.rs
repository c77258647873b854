pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_SHA: &str = env!("CODESCENT_GIT_SHA");
pub const BUILD_TIME: &str = env!("CODESCENT_BUILD_TIME");
pub const BUILD_PROFILE: &str = env!("CODESCENT_BUILD_PROFILE");

/// Backend URL used when neither the config file, the environment nor the
/// command line provides one.
pub const BAKED_API_URL: &str = env!("CODESCENT_BAKED_API_URL");

pub fn print_build_info() {
    println!("codescent {}", VERSION);
    println!("git: {}", GIT_SHA);
    println!("built: {}", BUILD_TIME);
    println!("profile: {}", BUILD_PROFILE);
    println!("default api: {}", BAKED_API_URL);
}

/// `codescent/<version>` for the HTTP user agent.
pub fn user_agent() -> String {
    format!("codescent/{} ({})", VERSION, GIT_SHA)
}

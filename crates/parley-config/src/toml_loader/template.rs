//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Parley Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[backend]
# base_url = "http://localhost:8000"
# connect_timeout = 10     # seconds, 1-120
# request_timeout = 60     # seconds, 1-600

[assistant]
# mode = "database"        # database, document
# suggestions = [
#   "Show me the database schema",
#   "Analyze data quality",
#   "Generate business insights",
#   "How is the database performance?",
# ]

[notifications]
# capacity = 16            # 1-256

[logging]
# level = "INFO"           # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}

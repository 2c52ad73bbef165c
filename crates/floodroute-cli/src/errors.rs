use console::style;
use floodroute_core::error::FloodRouteError;
use std::fmt;

/// Error with context and remediation suggestions
#[derive(Clone)]
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Location could not be geocoded
pub fn location_not_found(query: &str) -> CliError {
    CliError::new("Location not found")
        .with_context(format!("The geocoder returned no match.\n\nQuery: {}", query))
        .with_suggestion("Check the spelling or add a city and country")
        .with_suggestion("Or pin the point directly: --from-pin 19.0760,72.8777")
        .with_help("Run: floodroute assess --help")
}

/// Router found no drivable path
pub fn no_route(reason: &str) -> CliError {
    CliError::new("No route found")
        .with_context(format!("The routing service found no drivable path.\n\nReason: {}", reason))
        .with_suggestion("Make sure both points are reachable by road")
        .with_suggestion("Move a pinned point closer to a street")
}

/// Geocoding or routing service failed or timed out
pub fn provider_unavailable(provider: &str, detail: &str) -> CliError {
    CliError::new(format!("{} is unavailable", provider))
        .with_context(format!("A required service call failed.\n\nError: {}", detail))
        .with_suggestion("Check your network connection and try again")
        .with_suggestion("Raise the timeout: --timeout 30")
        .with_suggestion(
            "Or point to another instance in floodroute.toml (geocoder_url, router_url)",
        )
        .with_help("Run: floodroute config")
}

/// Neither address nor pin given for an endpoint
pub fn missing_endpoint(which: &str) -> CliError {
    CliError::new(format!("Missing {}", which))
        .with_context(format!("No address or pinned coordinate was given for the {}.", which))
        .with_suggestion(format!("Pass --{0} <ADDRESS> or --{0}-pin <LAT,LON>", flag_name(which)))
        .with_suggestion("Or run interactively: floodroute assess --interactive")
        .with_help("Run: floodroute assess --help")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check floodroute.toml for syntax errors")
        .with_suggestion("Check FLOODROUTE_* environment variables")
        .with_help("Run: floodroute config")
}

fn flag_name(which: &str) -> &'static str {
    if which == "origin" {
        "from"
    } else {
        "to"
    }
}

/// Map a domain error to a user-facing error with suggestions
pub fn from_domain(error: &FloodRouteError) -> CliError {
    match error {
        FloodRouteError::NotFound { query } => location_not_found(query),
        FloodRouteError::NoRouteFound { reason } => no_route(reason),
        FloodRouteError::Provider { provider, .. } | FloodRouteError::Timeout { provider, .. } => {
            provider_unavailable(provider, &error.to_string())
        }
        FloodRouteError::ConfigInvalid { key, reason } => invalid_config(key, reason),
        other => CliError::new(other.to_string()),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(cli_error) = error.downcast_ref::<CliError>() {
        return cli_error.clone();
    }

    if let Some(domain) = error.chain().find_map(|e| e.downcast_ref::<FloodRouteError>()) {
        let mapped = from_domain(domain);
        // Keep the outer context, e.g. which config file failed to load
        return if error.chain().count() > 1 {
            mapped.with_context(format!("{:#}", error))
        } else {
            mapped
        };
    }

    let message = error.to_string();
    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else {
        CliError::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_get_suggestions() {
        let err = from_domain(&FloodRouteError::NotFound { query: "Atlantis".into() });
        assert_eq!(err.message, "Location not found");
        assert!(err.context.unwrap().contains("Atlantis"));
        assert!(!err.suggestions.is_empty());

        let err = from_domain(&FloodRouteError::Timeout { provider: "osrm".into(), seconds: 15 });
        assert_eq!(err.message, "osrm is unavailable");
    }

    #[test]
    fn test_missing_endpoint_names_flags() {
        let err = missing_endpoint("destination");
        assert!(err.suggestions[0].contains("--to-pin"));
    }

    #[test]
    fn test_from_anyhow_finds_domain_error() {
        let err = anyhow::Error::new(FloodRouteError::NoRouteFound { reason: "NoRoute".into() });
        assert_eq!(from_anyhow(err).message, "No route found");

        let wrapped = anyhow::Error::new(missing_endpoint("origin"));
        assert_eq!(from_anyhow(wrapped).message, "Missing origin");
    }
}

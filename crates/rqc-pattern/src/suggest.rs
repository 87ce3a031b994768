//! Advisory helpers: pattern suggestions, glob conversion, curated examples

/// Heuristic suggestions for common pattern mistakes
///
/// Pure text advice, ordered by priority. No validation happens here.
pub fn pattern_suggestions(pattern: &str) -> Vec<String> {
    let mut suggestions = Vec::new();

    if pattern.contains('.') && !pattern.contains("\\.") {
        suggestions.push(
            "Use \\. to match literal dots in entity IDs (e.g., \"sensor\\.temperature\" \
             instead of \"sensor.temperature\")"
                .to_string(),
        );
    }

    if pattern.contains('*') && !pattern.contains(".*") {
        suggestions.push(
            "Use .* for wildcard matching instead of just * (e.g., \"sensor.*\" instead of \
             \"sensor*\")"
                .to_string(),
        );
    }

    if !pattern.starts_with('^') && !pattern.contains('|') {
        suggestions.push(
            "Consider starting with ^ to match from the beginning of entity IDs (e.g., \
             \"^sensor\\.\" instead of \"sensor\\.\")"
                .to_string(),
        );
    }

    if !pattern.ends_with('$') && !pattern.contains('|') {
        suggestions.push(
            "Consider ending with $ to match to the end of entity IDs for more precise matching"
                .to_string(),
        );
    }

    if pattern.contains("\\\\") {
        suggestions.push(
            "Double backslashes (\\\\) might not be necessary - use single backslashes for \
             escaping"
                .to_string(),
        );
    }

    if pattern.chars().count() < 5 {
        suggestions.push(
            "Common patterns: \"^sensor\\.\" (all sensors), \".*_temperature$\" (temperature \
             entities), \"^light\\.\" (all lights)"
                .to_string(),
        );
    }

    suggestions
}

/// Convert a simple glob pattern (e.g., `sensor.*_temperature`) to regex
pub fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::with_capacity(glob.len() * 2);
    for c in glob.chars() {
        match c {
            '.' => regex.push_str("\\."),
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '[' => regex.push_str("\\["),
            ']' => regex.push_str("\\]"),
            other => regex.push(other),
        }
    }
    regex
}

/// Curated patterns for common entity groups, keyed by a short name
pub const COMMON_PATTERNS: &[(&str, &str)] = &[
    ("all_sensors", "^sensor\\."),
    ("all_lights", "^light\\."),
    ("all_switches", "^switch\\."),
    ("all_binary_sensors", "^binary_sensor\\."),
    ("temperature_sensors", ".*temperature.*"),
    ("battery_sensors", ".*battery.*"),
    ("motion_sensors", ".*motion.*"),
    ("door_sensors", ".*door.*"),
    ("window_sensors", ".*window.*"),
    ("climate_entities", "^(climate|fan|humidifier)\\."),
    ("media_players", "^media_player\\."),
    ("cameras", "^camera\\."),
    ("covers", "^cover\\."),
    ("locks", "^lock\\."),
    ("vacuum_cleaners", "^vacuum\\."),
    ("weather_entities", "^weather\\."),
    ("person_entities", "^person\\."),
    ("device_trackers", "^device_tracker\\."),
    ("zones", "^zone\\."),
    ("automations", "^automation\\."),
    ("scripts", "^script\\."),
    ("scenes", "^scene\\."),
    ("input_helpers", "^input_(boolean|datetime|number|select|text)\\."),
    ("timers", "^timer\\."),
    ("counters", "^counter\\."),
];

/// A pattern example with a description, for quick-pick UIs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternExample {
    pub pattern: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

/// Worked pattern examples shown in the editor
pub const PATTERN_EXAMPLES: &[PatternExample] = &[
    PatternExample {
        pattern: "^sensor\\.",
        description: "All sensor entities",
        example: "sensor.temperature, sensor.humidity",
    },
    PatternExample {
        pattern: ".*temperature.*",
        description: "All entities with \"temperature\" in the name",
        example: "sensor.living_room_temperature, climate.bedroom_temperature",
    },
    PatternExample {
        pattern: "^(light|switch)\\.",
        description: "All lights and switches",
        example: "light.living_room, switch.kitchen",
    },
    PatternExample {
        pattern: "^sensor\\..*_(temperature|humidity)$",
        description: "Temperature and humidity sensors",
        example: "sensor.bedroom_temperature, sensor.kitchen_humidity",
    },
    PatternExample {
        pattern: "^binary_sensor\\..*_(door|window).*",
        description: "Door and window sensors",
        example: "binary_sensor.front_door, binary_sensor.bedroom_window",
    },
];

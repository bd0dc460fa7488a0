//! Sample vocabulary for generated data

/// Fictional customer roster; generation draws a subset sized to the user
/// count
pub const COMPANIES: &[&str] = &[
    "Altostrat",
    "Cymbal Group",
    "Nimbus Robotics",
    "Helix Dynamics",
    "Bluebird Logistics",
    "Cascade Biotech",
    "Ironwood Capital",
    "Statewide Media",
    "Harbor Analytics",
    "Pinnacle Retail",
    "Orchid Health",
    "Quantum Forge",
];

/// Given names for synthetic users
pub const FIRST_NAMES: &[&str] = &[
    "Ava", "Ben", "Carla", "Dmitri", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas", "Keiko",
    "Liam", "Mara", "Noah", "Olga", "Priya", "Quinn", "Rosa", "Sam", "Tara", "Umar", "Vera",
    "Wen", "Yusuf",
];

/// Family names for synthetic users
pub const LAST_NAMES: &[&str] = &[
    "Abbott", "Becker", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia", "Huang", "Ivanov",
    "Jensen", "Kowalski", "Lindqvist", "Moreau", "Nakamura", "Okafor", "Petrov", "Quispe",
    "Rossi", "Silva", "Tanaka", "Ueda", "Varga", "Weber", "Yilmaz",
];

/// Comments attached to well-rated calls
pub const GOOD_COMMENTS: &[&str] = &[
    "Great!",
    "Love this video thing!",
    "Feels like I am there!",
    "Good",
    "Rock solid video",
];

/// Comments attached to poorly-rated calls
pub const BAD_COMMENTS: &[&str] = &[
    "Disconnected mid-call",
    "Video dropouts",
    "Crackling audio",
    "Slows my laptop down",
    "Echo on the far end",
];

/// Operating systems reported on calls
pub const OPERATING_SYSTEMS: &[&str] = &["Mac OSX", "Windows", "Linux", "iOS", "Android"];

/// Call types, ordered most to least common
pub const CALL_TYPES: &[&str] = &["Web", "Presentation", "Room-and-Web", "Multi-room-and-Web"];

/// Support-ticket drivers
pub const TICKET_DRIVERS: &[&str] = &["Video", "Audio", "Network"];

/// Engagement project names
pub const PROJECT_NAMES: &[&str] = &["Pilot", "Pro Eval", "Global Launch", "QBR", "Case Study"];

/// Trending metric names
pub const TRENDING_METRICS: &[&str] = &["7DAU", "CPW", "CH/B/D", "RU", "Diversity"];

/// Email domain for a company name ("Cymbal Group" -> "cymbalgroup.example.com")
pub fn company_domain(company: &str) -> String {
    let slug: String = company
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    format!("{}.example.com", slug)
}

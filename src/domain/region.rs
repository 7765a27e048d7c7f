// Platform / regional routing for the Riot API

pub const DEFAULT_PLATFORM: &str = "na1";

/// Regional cluster serving account and match endpoints for a platform.
///
/// Unknown platforms route to `americas`.
pub fn regional_route(platform: &str) -> &'static str {
    match platform {
        "na1" | "br1" | "la1" | "la2" => "americas",
        "euw1" | "eun1" | "tr1" | "ru" => "europe",
        "kr" | "jp1" => "asia",
        "oc1" => "sea",
        _ => "americas",
    }
}

/// Tag line assumed when a name is given without `#TAG`.
pub fn default_tag_line(platform: &str) -> &'static str {
    match platform {
        "na1" => "NA1",
        "br1" => "BR1",
        "la1" => "LA1",
        "la2" => "LA2",
        "euw1" => "EUW",
        "eun1" => "EUNE",
        "tr1" => "TR1",
        "ru" => "RU",
        "kr" => "KR",
        "jp1" => "JP1",
        "oc1" => "OCE",
        _ => "NA1",
    }
}

/// Riot ID split into game name and tag line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl RiotId {
    /// Parse `Name#TAG`; without a `#` the platform default tag is used.
    pub fn parse(input: &str, platform: &str) -> Self {
        match input.split_once('#') {
            Some((name, tag)) => Self {
                game_name: name.trim().to_string(),
                tag_line: tag.trim().to_string(),
            },
            None => Self {
                game_name: input.trim().to_string(),
                tag_line: default_tag_line(platform).to_string(),
            },
        }
    }
}

impl std::fmt::Display for RiotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}

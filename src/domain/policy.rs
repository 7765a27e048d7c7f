// Per-resource expiration and write rules
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Account,
    Profile,
    MatchIds,
    MatchDetail,
    RankedStanding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    For(Duration),
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Latest write wins and resets the stored timestamp.
    Upsert,
    /// First write wins; later writes for the same key are ignored.
    InsertOnce,
}

impl ResourceType {
    pub const ALL: [ResourceType; 5] = [
        ResourceType::Account,
        ResourceType::Profile,
        ResourceType::MatchIds,
        ResourceType::MatchDetail,
        ResourceType::RankedStanding,
    ];

    pub fn ttl(self) -> Ttl {
        match self {
            ResourceType::Account => Ttl::For(Duration::days(7)),
            ResourceType::Profile => Ttl::For(Duration::hours(24)),
            ResourceType::MatchIds => Ttl::For(Duration::hours(1)),
            ResourceType::MatchDetail => Ttl::Never,
            ResourceType::RankedStanding => Ttl::For(Duration::hours(1)),
        }
    }

    pub fn write_mode(self) -> WriteMode {
        match self {
            ResourceType::MatchDetail => WriteMode::InsertOnce,
            _ => WriteMode::Upsert,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Account => "account",
            ResourceType::Profile => "profile",
            ResourceType::MatchIds => "match_ids",
            ResourceType::MatchDetail => "match",
            ResourceType::RankedStanding => "ranked",
        }
    }

    /// Table holding this resource type.
    pub fn table(self) -> &'static str {
        match self {
            ResourceType::Account => "accounts",
            ResourceType::Profile => "profiles",
            ResourceType::MatchIds => "match_id_lists",
            ResourceType::MatchDetail => "matches",
            ResourceType::RankedStanding => "ranked_standings",
        }
    }
}

/// True while an entry written at `stored_at` is still fresh at `now`.
pub fn is_valid(resource: ResourceType, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match resource.ttl() {
        Ttl::Never => true,
        Ttl::For(ttl) => now.signed_duration_since(stored_at) < ttl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutable_types_expire_at_ttl_boundary() {
        let stored = Utc::now();
        for resource in ResourceType::ALL {
            let Ttl::For(ttl) = resource.ttl() else {
                continue;
            };
            assert!(is_valid(resource, stored, stored));
            assert!(is_valid(resource, stored, stored + ttl - Duration::seconds(1)));
            assert!(!is_valid(resource, stored, stored + ttl));
        }
    }

    #[test]
    fn test_match_detail_never_expires() {
        let stored = Utc::now() - Duration::days(3650);
        assert!(is_valid(ResourceType::MatchDetail, stored, Utc::now()));
        assert_eq!(ResourceType::MatchDetail.write_mode(), WriteMode::InsertOnce);
        assert_eq!(ResourceType::Account.write_mode(), WriteMode::Upsert);
    }

    #[test]
    fn test_policy_table() {
        assert_eq!(ResourceType::Account.ttl(), Ttl::For(Duration::days(7)));
        assert_eq!(ResourceType::Profile.ttl(), Ttl::For(Duration::hours(24)));
        assert_eq!(ResourceType::MatchIds.ttl(), Ttl::For(Duration::hours(1)));
        assert_eq!(
            ResourceType::RankedStanding.ttl(),
            Ttl::For(Duration::hours(1))
        );
    }
}

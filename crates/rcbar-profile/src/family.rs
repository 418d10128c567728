//! Profile families and their fixed vertex cardinality.

use std::fmt;
use std::str::FromStr;

use rcbar_core::{RcbarError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProfileFamily {
    Abutment,
    Footing,
    RetainingWall,
    WingWall,
}

impl ProfileFamily {
    pub const ALL: [ProfileFamily; 4] = [
        ProfileFamily::Abutment,
        ProfileFamily::Footing,
        ProfileFamily::RetainingWall,
        ProfileFamily::WingWall,
    ];

    /// Number of vertices in every station of this family.
    pub fn cardinality(self) -> usize {
        match self {
            ProfileFamily::Abutment => 10,
            ProfileFamily::Footing => 6,
            ProfileFamily::RetainingWall | ProfileFamily::WingWall => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProfileFamily::Abutment => "Abutment",
            ProfileFamily::Footing => "Footing",
            ProfileFamily::RetainingWall => "RetainingWall",
            ProfileFamily::WingWall => "WingWall",
        }
    }
}

impl fmt::Display for ProfileFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProfileFamily {
    type Err = RcbarError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RcbarError::UnknownProfileFamily(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_family() {
        assert_eq!("abutment".parse::<ProfileFamily>().unwrap(), ProfileFamily::Abutment);
        assert_eq!(" WingWall ".parse::<ProfileFamily>().unwrap(), ProfileFamily::WingWall);
        assert!(matches!(
            "Pier".parse::<ProfileFamily>(),
            Err(RcbarError::UnknownProfileFamily(name)) if name == "Pier"
        ));
    }

    #[test]
    fn test_cardinality() {
        assert_eq!(ProfileFamily::Abutment.cardinality(), 10);
        assert_eq!(ProfileFamily::Footing.cardinality(), 6);
        assert_eq!(ProfileFamily::WingWall.cardinality(), 8);
    }
}

// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::ConfigError;

/// Target packaging ecosystem.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(try_from = "String")]
pub enum InterfaceFamily {
    /// Plain Verilog bundle without any bus wrapper metadata.
    #[value(name = "general")]
    Generic,
    /// Xilinx-style packaged core (pcore + IP-XACT).
    #[default]
    #[value(name = "axi")]
    Axi,
    /// Altera/Qsys-style packaged core.
    #[value(name = "avalon")]
    Avalon,
}

impl InterfaceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceFamily::Generic => "general",
            InterfaceFamily::Axi => "axi",
            InterfaceFamily::Avalon => "avalon",
        }
    }
}

impl fmt::Display for InterfaceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceFamily {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" | "generic" => Ok(InterfaceFamily::Generic),
            "axi" => Ok(InterfaceFamily::Axi),
            "avalon" => Ok(InterfaceFamily::Avalon),
            _ => Err(ConfigError::UnsupportedFamily(s.to_string())),
        }
    }
}

impl TryFrom<String> for InterfaceFamily {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_family_names() {
        assert_eq!("axi".parse::<InterfaceFamily>().unwrap(), InterfaceFamily::Axi);
        assert_eq!(
            "Avalon".parse::<InterfaceFamily>().unwrap(),
            InterfaceFamily::Avalon
        );
        assert_eq!(
            "general".parse::<InterfaceFamily>().unwrap(),
            InterfaceFamily::Generic
        );
    }

    #[test]
    fn unsupported_family_is_a_config_error() {
        let err = "wishbone".parse::<InterfaceFamily>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFamily(ref s) if s == "wishbone"));
        assert_eq!(err.to_string(), "Interface type 'wishbone' is not supported.");
    }
}

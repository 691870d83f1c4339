//! Closed keyword sets consumed by the sizing functions
//!
//! Keywords are matched case-insensitively after trimming, with `-` read as
//! `_`. Each enum carries its lookup table as a method.

use crate::{TallyError, TallyResult};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

fn normalize(keyword: &str) -> String {
    keyword.trim().to_lowercase().replace('-', "_")
}

fn unknown<T: fmt::Display>(kind: &str, keyword: &str, all: &[T]) -> TallyError {
    let expected: Vec<String> = all.iter().map(|k| k.to_string()).collect();
    TallyError::UnknownKeyword {
        kind: kind.to_string(),
        keyword: keyword.trim().to_string(),
        expected: expected.join(", "),
    }
}

/// Network distance between two endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Local,
    Regional,
    Continental,
    Global,
}

impl Scope {
    pub const ALL: [Scope; 4] = [Scope::Local, Scope::Regional, Scope::Continental, Scope::Global];

    /// Typical round-trip time in seconds
    pub fn round_trip_seconds(&self) -> Decimal {
        match self {
            Scope::Local => Decimal::new(5, 4),
            Scope::Regional => Decimal::new(1, 2),
            Scope::Continental => Decimal::new(5, 2),
            Scope::Global => Decimal::new(15, 2),
        }
    }
}

impl FromStr for Scope {
    type Err = TallyError;

    fn from_str(s: &str) -> TallyResult<Self> {
        match normalize(s).as_str() {
            "local" | "lan" => Ok(Scope::Local),
            "regional" | "region" => Ok(Scope::Regional),
            "continental" | "continent" => Ok(Scope::Continental),
            "global" | "intercontinental" => Ok(Scope::Global),
            _ => Err(unknown("network scope", s, &Scope::ALL)),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Local => write!(f, "local"),
            Scope::Regional => write!(f, "regional"),
            Scope::Continental => write!(f, "continental"),
            Scope::Global => write!(f, "global"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkType {
    Gigabit,
    TenGig,
    HundredGig,
    Wifi,
    FourG,
    FiveG,
}

impl NetworkType {
    pub const ALL: [NetworkType; 6] = [
        NetworkType::Gigabit,
        NetworkType::TenGig,
        NetworkType::HundredGig,
        NetworkType::Wifi,
        NetworkType::FourG,
        NetworkType::FiveG,
    ];

    /// Sustained throughput in MB/s
    pub fn throughput_mbps(&self) -> Decimal {
        match self {
            NetworkType::Gigabit => Decimal::from(125),
            NetworkType::TenGig => Decimal::from(1_250),
            NetworkType::HundredGig => Decimal::from(12_500),
            NetworkType::Wifi => Decimal::from(25),
            NetworkType::FourG => Decimal::new(25, 1),
            NetworkType::FiveG => Decimal::from(50),
        }
    }
}

impl FromStr for NetworkType {
    type Err = TallyError;

    fn from_str(s: &str) -> TallyResult<Self> {
        match normalize(s).as_str() {
            "gigabit" | "1g" | "gbe" => Ok(NetworkType::Gigabit),
            "ten_gig" | "10g" | "10gbe" => Ok(NetworkType::TenGig),
            "hundred_gig" | "100g" | "100gbe" => Ok(NetworkType::HundredGig),
            "wifi" | "wi_fi" => Ok(NetworkType::Wifi),
            "four_g" | "4g" | "lte" => Ok(NetworkType::FourG),
            "five_g" | "5g" => Ok(NetworkType::FiveG),
            _ => Err(unknown("network type", s, &NetworkType::ALL)),
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::Gigabit => write!(f, "gigabit"),
            NetworkType::TenGig => write!(f, "ten_gig"),
            NetworkType::HundredGig => write!(f, "hundred_gig"),
            NetworkType::Wifi => write!(f, "wifi"),
            NetworkType::FourG => write!(f, "four_g"),
            NetworkType::FiveG => write!(f, "five_g"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    Ssd,
    SataSsd,
    Nvme,
    PcieSsd,
    Hdd,
}

impl StorageType {
    pub const ALL: [StorageType; 5] = [
        StorageType::Ssd,
        StorageType::SataSsd,
        StorageType::Nvme,
        StorageType::PcieSsd,
        StorageType::Hdd,
    ];

    /// Sequential read throughput in MB/s
    pub fn read_mbps(&self) -> Decimal {
        match self {
            StorageType::Ssd => Decimal::from(500),
            StorageType::SataSsd => Decimal::from(550),
            StorageType::Nvme => Decimal::from(3_000),
            StorageType::PcieSsd => Decimal::from(5_000),
            StorageType::Hdd => Decimal::from(150),
        }
    }

    /// Random access latency in seconds
    pub fn access_latency_seconds(&self) -> Decimal {
        match self {
            StorageType::Ssd | StorageType::SataSsd => Decimal::new(1, 4),
            StorageType::Nvme => Decimal::new(2, 5),
            StorageType::PcieSsd => Decimal::new(1, 5),
            StorageType::Hdd => Decimal::new(1, 2),
        }
    }
}

impl FromStr for StorageType {
    type Err = TallyError;

    fn from_str(s: &str) -> TallyResult<Self> {
        match normalize(s).as_str() {
            "ssd" => Ok(StorageType::Ssd),
            "sata_ssd" | "sata" => Ok(StorageType::SataSsd),
            "nvme" => Ok(StorageType::Nvme),
            "pcie_ssd" | "pcie" => Ok(StorageType::PcieSsd),
            "hdd" => Ok(StorageType::Hdd),
            _ => Err(unknown("storage type", s, &StorageType::ALL)),
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Ssd => write!(f, "ssd"),
            StorageType::SataSsd => write!(f, "sata_ssd"),
            StorageType::Nvme => write!(f, "nvme"),
            StorageType::PcieSsd => write!(f, "pcie_ssd"),
            StorageType::Hdd => write!(f, "hdd"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionType {
    Gzip,
    Lz4,
    Zstd,
    Bzip2,
    Snappy,
    None,
}

impl CompressionType {
    pub const ALL: [CompressionType; 6] = [
        CompressionType::Gzip,
        CompressionType::Lz4,
        CompressionType::Zstd,
        CompressionType::Bzip2,
        CompressionType::Snappy,
        CompressionType::None,
    ];

    /// Typical compression ratio (original size / compressed size)
    pub fn ratio(&self) -> Decimal {
        match self {
            CompressionType::Gzip => Decimal::from(3),
            CompressionType::Lz4 => Decimal::from(2),
            CompressionType::Zstd => Decimal::new(35, 1),
            CompressionType::Bzip2 => Decimal::from(4),
            CompressionType::Snappy => Decimal::new(25, 1),
            CompressionType::None => Decimal::ONE,
        }
    }
}

impl FromStr for CompressionType {
    type Err = TallyError;

    fn from_str(s: &str) -> TallyResult<Self> {
        match normalize(s).as_str() {
            "gzip" | "gz" => Ok(CompressionType::Gzip),
            "lz4" => Ok(CompressionType::Lz4),
            "zstd" | "zstandard" => Ok(CompressionType::Zstd),
            "bzip2" | "bz2" => Ok(CompressionType::Bzip2),
            "snappy" => Ok(CompressionType::Snappy),
            "none" | "uncompressed" => Ok(CompressionType::None),
            _ => Err(unknown("compression type", s, &CompressionType::ALL)),
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionType::Gzip => write!(f, "gzip"),
            CompressionType::Lz4 => write!(f, "lz4"),
            CompressionType::Zstd => write!(f, "zstd"),
            CompressionType::Bzip2 => write!(f, "bzip2"),
            CompressionType::Snappy => write!(f, "snappy"),
            CompressionType::None => write!(f, "none"),
        }
    }
}

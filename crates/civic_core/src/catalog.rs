use crate::error::{CivicError, Result};
use crate::scoring::sort_by_locale;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Region {
    Konkan,
    #[serde(rename = "Paschim Maharashtra")]
    PaschimMaharashtra,
    Khandesh,
    Marathwada,
    Vidarbha,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Konkan => "Konkan",
            Region::PaschimMaharashtra => "Paschim Maharashtra",
            Region::Khandesh => "Khandesh",
            Region::Marathwada => "Marathwada",
            Region::Vidarbha => "Vidarbha",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CityData {
    pub name: String,
    pub district: String,
    pub region: Region,
    pub lat: f64,
    pub lng: f64,
}

/// Candidate cities and wards. The leaderboard iterates this list, never the
/// cities that happen to appear in issue data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub cities: Vec<CityData>,
    #[serde(default = "default_wards")]
    pub wards: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::maharashtra()
    }
}

impl Catalog {
    /// Reads a `.toml`, `.yaml` or `.yml` catalog file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        let catalog: Catalog = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&raw)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)?,
            other => {
                return Err(CivicError::Catalog(format!(
                    "unsupported catalog format: {}",
                    other.unwrap_or("<none>")
                ))
                .into());
            }
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cities.is_empty() {
            return Err(CivicError::Catalog("no cities listed".to_string()));
        }
        if self.wards.is_empty() {
            return Err(CivicError::Catalog("no wards listed".to_string()));
        }
        let mut seen = HashSet::new();
        for city in &self.cities {
            if !seen.insert(city.name.as_str()) {
                return Err(CivicError::Catalog(format!("duplicate city: {}", city.name)));
            }
        }
        Ok(())
    }

    /// City names in collation order.
    pub fn city_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cities.iter().map(|city| city.name.clone()).collect();
        sort_by_locale(&mut names);
        names
    }

    pub fn city(&self, name: &str) -> Option<&CityData> {
        self.cities.iter().find(|city| city.name == name)
    }

    pub fn maharashtra() -> Self {
        let cities = MAHARASHTRA_CITIES
            .iter()
            .map(|(name, district, region, lat, lng)| CityData {
                name: name.to_string(),
                district: district.to_string(),
                region: *region,
                lat: *lat,
                lng: *lng,
            })
            .collect();
        Self {
            cities,
            wards: default_wards(),
        }
    }
}

fn default_wards() -> Vec<String> {
    ["Ward A", "Ward B", "Ward C", "Ward D", "Ward E"]
        .iter()
        .map(|ward| ward.to_string())
        .collect()
}

const MAHARASHTRA_CITIES: &[(&str, &str, Region, f64, f64)] = &[
    ("Mumbai", "Mumbai City", Region::Konkan, 19.0760, 72.8777),
    ("Navi Mumbai", "Thane", Region::Konkan, 19.0330, 73.0297),
    ("Thane", "Thane", Region::Konkan, 19.2183, 72.9781),
    ("Kalyan-Dombivli", "Thane", Region::Konkan, 19.2344, 73.1296),
    ("Ulhasnagar", "Thane", Region::Konkan, 19.2215, 73.1645),
    ("Mira-Bhayandar", "Thane", Region::Konkan, 19.2952, 72.8541),
    ("Bhiwandi-Nizampur", "Thane", Region::Konkan, 19.2813, 73.0483),
    ("Vasai-Virar", "Palghar", Region::Konkan, 19.3919, 72.8397),
    ("Palghar", "Palghar", Region::Konkan, 19.6936, 72.7655),
    ("Panvel", "Raigad", Region::Konkan, 18.9894, 73.1175),
    ("Alibag", "Raigad", Region::Konkan, 18.6584, 72.8773),
    ("Ratnagiri", "Ratnagiri", Region::Konkan, 16.9902, 73.3120),
    ("Chiplun", "Ratnagiri", Region::Konkan, 17.5323, 73.5175),
    ("Sindhudurg", "Sindhudurg", Region::Konkan, 16.0360, 73.5620),
    ("Malvan", "Sindhudurg", Region::Konkan, 16.0617, 73.4683),
    ("Pune", "Pune", Region::PaschimMaharashtra, 18.5204, 73.8567),
    ("Pimpri-Chinchwad", "Pune", Region::PaschimMaharashtra, 18.6298, 73.7997),
    ("Solapur", "Solapur", Region::PaschimMaharashtra, 17.6599, 75.9064),
    ("Kolhapur", "Kolhapur", Region::PaschimMaharashtra, 16.7050, 74.2433),
    ("Ichalkaranji", "Kolhapur", Region::PaschimMaharashtra, 16.7001, 74.4567),
    ("Sangli-Miraj-Kupwad", "Sangli", Region::PaschimMaharashtra, 16.8524, 74.5815),
    ("Satara", "Satara", Region::PaschimMaharashtra, 17.6805, 73.9915),
    ("Karad", "Satara", Region::PaschimMaharashtra, 17.2855, 74.1835),
    ("Ahmednagar", "Ahmednagar", Region::PaschimMaharashtra, 19.0948, 74.7480),
    ("Nashik", "Nashik", Region::Khandesh, 19.9975, 73.7898),
    ("Malegaon", "Nashik", Region::Khandesh, 20.5517, 74.5298),
    ("Dhule", "Dhule", Region::Khandesh, 20.9042, 74.7749),
    ("Jalgaon", "Jalgaon", Region::Khandesh, 21.0077, 75.5626),
    ("Bhusawal", "Jalgaon", Region::Khandesh, 21.0478, 75.7725),
    ("Nandurbar", "Nandurbar", Region::Khandesh, 21.3739, 74.2372),
    ("Aurangabad (Chhatrapati Sambhajinagar)", "Aurangabad", Region::Marathwada, 19.8762, 75.3433),
    ("Nanded-Waghala", "Nanded", Region::Marathwada, 19.1429, 77.3039),
    ("Latur", "Latur", Region::Marathwada, 18.4088, 76.5604),
    ("Parbhani", "Parbhani", Region::Marathwada, 19.2644, 76.7767),
    ("Beed", "Beed", Region::Marathwada, 18.9891, 75.7601),
    ("Osmanabad (Dharashiv)", "Osmanabad", Region::Marathwada, 18.1852, 76.0420),
    ("Jalna", "Jalna", Region::Marathwada, 19.8297, 75.8800),
    ("Hingoli", "Hingoli", Region::Marathwada, 19.7181, 77.1478),
    ("Nagpur", "Nagpur", Region::Vidarbha, 21.1458, 79.0882),
    ("Amravati", "Amravati", Region::Vidarbha, 20.9320, 77.7523),
    ("Akola", "Akola", Region::Vidarbha, 20.7002, 77.0082),
    ("Chandrapur", "Chandrapur", Region::Vidarbha, 19.9511, 79.2961),
    ("Yavatmal", "Yavatmal", Region::Vidarbha, 20.3888, 78.1204),
    ("Wardha", "Wardha", Region::Vidarbha, 20.7453, 78.6022),
    ("Gondia", "Gondia", Region::Vidarbha, 21.4624, 80.1904),
    ("Bhandara", "Bhandara", Region::Vidarbha, 21.1685, 79.6548),
    ("Washim", "Washim", Region::Vidarbha, 20.1012, 77.1332),
    ("Gadchiroli", "Gadchiroli", Region::Vidarbha, 20.1850, 79.9922),
    ("Buldhana", "Buldhana", Region::Vidarbha, 20.5284, 76.1843),
];

//! Search modes, county GIS lookup and quick-action links.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{DashboardError, Result};

pub const AGENCY_HOME_URL: &str = "https://agents.agencymatrix.com/#/";
pub const NEW_CUSTOMER_URL: &str = "https://agents.agencymatrix.com/customerEdit.php?id=0";

const CLIENTS_FOLDER_ID: &str = "11O0Cm9gOdgXp_j8OXMO4Pm5tqh18uXd5";
const AGENCY_EMAIL: &str = "docs@billlayneinsurance.com";

static HAS_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("Invalid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Agency,
    Web,
    RealEstate,
    People,
    Drive,
}

impl SearchMode {
    pub const ALL: [SearchMode; 5] = [
        SearchMode::Agency,
        SearchMode::Web,
        SearchMode::RealEstate,
        SearchMode::People,
        SearchMode::Drive,
    ];

    pub fn placeholder(&self) -> &'static str {
        match self {
            SearchMode::Agency => "Search Agency Matrix by name or address…",
            SearchMode::Web => "Search the web…",
            SearchMode::RealEstate => "Enter full address (City, NC, County)…",
            SearchMode::People => "Enter name, phone, or address…",
            SearchMode::Drive => "Search client folders…",
        }
    }

    /// Real-estate mode also offers the county tax/GIS lookup
    pub fn offers_gis(&self) -> bool {
        matches!(self, SearchMode::RealEstate)
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMode::Agency => "agency",
            SearchMode::Web => "web",
            SearchMode::RealEstate => "realestate",
            SearchMode::People => "people",
            SearchMode::Drive => "drive",
        };
        f.write_str(name)
    }
}

impl FromStr for SearchMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "agency" => Ok(SearchMode::Agency),
            "web" => Ok(SearchMode::Web),
            "realestate" | "real-estate" | "zillow" => Ok(SearchMode::RealEstate),
            "people" => Ok(SearchMode::People),
            "drive" | "onedrive" | "clients" => Ok(SearchMode::Drive),
            other => Err(DashboardError::NotFound(format!("search mode {}", other))),
        }
    }
}

/// Destination URL for a query in the given mode
pub fn search_url(mode: SearchMode, query: &str) -> Result<String> {
    let query = query.trim();
    if query.is_empty() {
        return Err(DashboardError::MissingField("Search term".to_string()));
    }
    let encoded = urlencoding::encode(query);

    let url = match mode {
        SearchMode::Agency => {
            let selection = if HAS_DIGIT.is_match(query) {
                "Address"
            } else {
                "Name"
            };
            format!(
                "https://agents.agencymatrix.com/#/customer/search?selection={}&query={}",
                selection, encoded
            )
        }
        SearchMode::Web => format!("https://www.google.com/search?q={}", encoded),
        SearchMode::RealEstate => format!("https://www.zillow.com/homes/{}_rb/", encoded),
        SearchMode::People => format!("https://www.truepeoplesearch.com/results?name={}", encoded),
        SearchMode::Drive => {
            let drive_query = format!("parent:{} title:({})", CLIENTS_FOLDER_ID, query);
            format!(
                "https://drive.google.com/drive/search?q={}&authuser={}",
                urlencoding::encode(&drive_query),
                AGENCY_EMAIL
            )
        }
    };

    Ok(url)
}

pub fn clients_folder_url() -> String {
    format!(
        "https://drive.google.com/drive/folders/{}?authuser={}",
        CLIENTS_FOLDER_ID, AGENCY_EMAIL
    )
}

struct County {
    key: &'static str,
    name: &'static str,
    url: &'static str,
    note: Option<&'static str>,
}

const COUNTIES: &[County] = &[
    County { key: "surry", name: "Surry County", url: "https://gis.surryinfo.com/?addr={query}", note: None },
    County { key: "yadkin", name: "Yadkin County", url: "http://gis.yadkinshunt.com/yadkingis/?find={query}", note: None },
    County { key: "wilkes", name: "Wilkes County", url: "https://gis.wilkescounty.net/wilkesjs/", note: Some("Manual search required on site.") },
    County { key: "forsyth", name: "Forsyth County", url: "http://www.cityofws.org/maps?find={query}", note: None },
    County { key: "mecklenburg", name: "Mecklenburg County", url: "https://polaris3g.mecklenburgcountync.gov/search?str={query}", note: None },
    County { key: "wake", name: "Wake County", url: "https://maps.raleighnc.gov/iMAPS/?search={query}", note: None },
];

/// Resolved county GIS page for an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GisTarget {
    pub county: String,
    pub url: String,
    pub note: Option<String>,
}

/// Find the first known county named in the address and build its GIS URL
pub fn gis_lookup(address: &str) -> Result<GisTarget> {
    let address = address.trim();
    if address.is_empty() {
        return Err(DashboardError::MissingField("An address for GIS search".to_string()));
    }

    let lower = address.to_lowercase();
    let county = COUNTIES
        .iter()
        .find(|c| lower.contains(c.key))
        .ok_or(DashboardError::UnknownCounty)?;

    Ok(GisTarget {
        county: county.name.to_string(),
        url: county
            .url
            .replace("{query}", &urlencoding::encode(address)),
        note: county.note.map(str::to_string),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub url: &'static str,
}

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        title: "Social Media Composer",
        description: "Craft posts for social platforms",
        icon: "fa-solid fa-share-nodes",
        url: "https://aistudio.google.com/u/0/apps/drive/1RB3_0--C1TkvUeMunl6o6OcU9wm2Os0m?showPreview=true&showAssistant=true",
    },
    QuickAction {
        title: "New Business Followup",
        description: "Draft follow-up emails for leads",
        icon: "fa-solid fa-user-plus",
        url: "https://aistudio.google.com/u/2/apps/drive/1k8WpG5vdFJhZJp_UORoFh7GI1sxwrBFj?showPreview=true&showAssistant=true&resourceKey=",
    },
    QuickAction {
        title: "Email Composer",
        description: "General purpose email drafting",
        icon: "fa-solid fa-envelope-open-text",
        url: "https://aistudio.google.com/u/2/apps/drive/1pHGvEjfpAiNNsoBD9tsV3jWP5G9KdBYf?showPreview=true&showAssistant=true",
    },
    QuickAction {
        title: "Create PDF Document",
        description: "Claude PDF generator project",
        icon: "fa-solid fa-file-pdf",
        url: "https://claude.ai/project/01993948-a57c-7166-ae81-c547e60fe8fa",
    },
    QuickAction {
        title: "Home Address Research",
        description: "Property & address analysis",
        icon: "fa-solid fa-house-chimney-user",
        url: "https://claude.ai/project/0198f624-8a25-73be-a9e1-98389bc44b2c",
    },
    QuickAction {
        title: "Auto Quote Template",
        description: "Generate auto insurance quotes",
        icon: "fa-solid fa-car",
        url: "https://claude.ai/project/0197c35a-7c70-72f7-8d5c-83df3286f0a4",
    },
    QuickAction {
        title: "Reports",
        description: "View analytics",
        icon: "fa-solid fa-chart-bar",
        url: "https://agents.agencymatrix.com/#/reports",
    },
];

pub fn find_quick_action(title: &str) -> Result<&'static QuickAction> {
    let wanted = title.trim().to_lowercase();
    QUICK_ACTIONS
        .iter()
        .find(|a| a.title.to_lowercase() == wanted)
        .ok_or_else(|| DashboardError::NotFound(format!("quick action {}", title)))
}

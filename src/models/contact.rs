use serde::{Deserialize, Serialize};

/// Company information in canonical shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub founded: Option<i32>,
    pub linkedin_url: Option<String>,
}

impl CompanyInfo {
    /// True when no attribute survived normalization
    pub fn is_empty(&self) -> bool {
        self == &CompanyInfo::default()
    }
}

/// One education entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationInfo {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub year: Option<String>,
}

impl EducationInfo {
    pub fn is_empty(&self) -> bool {
        self.school.is_none() && self.degree.is_none() && self.year.is_none()
    }
}

/// Person information in canonical shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonInfo {
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub linkedin_profile: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    /// At most five entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// At most two entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationInfo>>,
}

impl PersonInfo {
    pub fn is_empty(&self) -> bool {
        self == &PersonInfo::default()
    }
}

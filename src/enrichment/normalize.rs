//! Reshaping of provider records into [`PersonInfo`] and [`CompanyInfo`].
//!
//! Each canonical attribute is read from a fixed list of alternative field
//! paths, first match wins. The lists are the constants below.

use crate::models::{clean_value, CompanyInfo, EducationInfo, PersonInfo, RawRecord};
use serde_json::Value;

pub const MAX_SKILLS: usize = 5;
pub const MAX_EDUCATION: usize = 2;

const PERSON_FULL_NAME: &[&str] = &["full_name", "name"];
const PERSON_JOB_TITLE: &[&str] = &["job_title", "title"];
const PERSON_EMAIL: &[&str] = &["email", "work_email", "personal_email"];
const PERSON_LINKEDIN: &[&str] = &["linkedin_url", "linkedin_profile"];
const PERSON_COMPANY: &[&str] = &["company", "job_company_name", "company_name"];
const PERSON_LOCATION: &[&str] = &["location_name", "location", "location.name"];

const COMPANY_NAME: &[&str] = &["name", "display_name"];
const COMPANY_DOMAIN: &[&str] = &["domain", "website"];
const COMPANY_SIZE: &[&str] = &["size", "employee_count_range"];
const COMPANY_LOCATION: &[&str] = &["location.name", "location_name", "location"];
const COMPANY_INDUSTRY: &[&str] = &["industry"];
const COMPANY_WEBSITE: &[&str] = &["website", "domain"];
const COMPANY_FOUNDED: &[&str] = &["founded"];
const COMPANY_LINKEDIN: &[&str] = &["linkedin_url"];

// Employer fields on a person record: current experience first, then the
// flattened `job_company_*` columns, then the flat shape of search results.
const EMPLOYER_NAME: &[&str] = &["job_company_name", "company"];
const EMPLOYER_DOMAIN: &[&str] = &["job_company_website", "domain"];
const EMPLOYER_SIZE: &[&str] = &["job_company_size", "company_size"];
const EMPLOYER_LOCATION: &[&str] = &["job_company_location_name", "location"];
const EMPLOYER_INDUSTRY: &[&str] = &["job_company_industry", "industry"];
const EMPLOYER_FOUNDED: &[&str] = &["job_company_founded"];
const EMPLOYER_LINKEDIN: &[&str] = &["job_company_linkedin_url"];

/// Prefix `https://` when a URL has no scheme
pub fn ensure_scheme(url: String) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url
    } else {
        format!("https://{}", url)
    }
}

/// Current job: the entry flagged `is_primary`, else the first one
pub fn primary_experience(raw: &RawRecord) -> Option<RawRecord> {
    let experience = raw.array("experience");
    experience
        .iter()
        .find(|exp| exp.get("is_primary").and_then(Value::as_bool) == Some(true))
        .or_else(|| experience.first())
        .and_then(|exp| RawRecord::from_value(exp.clone()))
}

/// Map a provider person record onto the canonical person shape
pub fn normalize_person(raw: &RawRecord) -> PersonInfo {
    let current_job = primary_experience(raw);

    let full_name = raw.first_clean(PERSON_FULL_NAME).or_else(|| {
        let joined = [raw.first_clean(&["first_name"]), raw.first_clean(&["last_name"])]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        (!joined.is_empty()).then_some(joined)
    });

    let job_title = current_job
        .as_ref()
        .and_then(|job| job.first_clean(&["title.name", "title"]))
        .or_else(|| raw.first_clean(PERSON_JOB_TITLE));

    let company = raw
        .first_clean(PERSON_COMPANY)
        .or_else(|| raw.first_clean(&["company.name"]))
        .or_else(|| {
            current_job
                .as_ref()
                .and_then(|job| job.first_clean(&["company.name"]))
        });

    let skills: Vec<String> = raw
        .array("skills")
        .iter()
        .filter_map(clean_value)
        .take(MAX_SKILLS)
        .collect();

    let education: Vec<EducationInfo> = raw
        .array("education")
        .iter()
        .take(MAX_EDUCATION)
        .filter_map(|edu| RawRecord::from_value(edu.clone()))
        .map(|edu| EducationInfo {
            school: edu.first_clean(&["school.name", "school"]),
            degree: edu
                .array("degrees")
                .first()
                .and_then(clean_value)
                .or_else(|| edu.first_clean(&["degree"])),
            year: edu.first_clean(&["end_date", "year"]),
        })
        .filter(|edu| !edu.is_empty())
        .collect();

    PersonInfo {
        full_name,
        job_title,
        email: raw.first_clean(PERSON_EMAIL).or_else(|| first_listed_email(raw)),
        linkedin_profile: raw
            .first_clean(PERSON_LINKEDIN)
            .or_else(|| linkedin_from_profiles(raw))
            .map(ensure_scheme),
        company,
        location: raw.first_clean(PERSON_LOCATION),
        skills: (!skills.is_empty()).then_some(skills),
        education: (!education.is_empty()).then_some(education),
    }
}

/// Map a standalone provider company record onto the canonical shape
pub fn normalize_company(raw: &RawRecord) -> CompanyInfo {
    CompanyInfo {
        name: raw.first_clean(COMPANY_NAME),
        domain: raw.first_clean(COMPANY_DOMAIN),
        size: raw.first_clean(COMPANY_SIZE),
        location: raw.first_clean(COMPANY_LOCATION),
        industry: raw.first_clean(COMPANY_INDUSTRY),
        website: raw.first_clean(COMPANY_WEBSITE).map(ensure_scheme),
        founded: founded_year(raw, COMPANY_FOUNDED),
        linkedin_url: raw.first_clean(COMPANY_LINKEDIN).map(ensure_scheme),
    }
}

/// Derive the employer from a person record.
///
/// Used whenever no standalone company record exists, by both the direct
/// lookup and the search path. Returns `None` when nothing is known.
pub fn company_from_person(raw: &RawRecord) -> Option<CompanyInfo> {
    let employer = primary_experience(raw)
        .and_then(|job| job.sub_record("company"))
        .map(|company| normalize_company(&company))
        .unwrap_or_default();

    let domain = employer
        .domain
        .clone()
        .or_else(|| raw.first_clean(EMPLOYER_DOMAIN));

    let company = CompanyInfo {
        name: employer.name.or_else(|| raw.first_clean(EMPLOYER_NAME)),
        website: employer.website.or_else(|| domain.clone().map(ensure_scheme)),
        domain,
        size: employer.size.or_else(|| raw.first_clean(EMPLOYER_SIZE)),
        location: employer
            .location
            .or_else(|| raw.first_clean(EMPLOYER_LOCATION)),
        industry: employer
            .industry
            .or_else(|| raw.first_clean(EMPLOYER_INDUSTRY)),
        founded: employer
            .founded
            .or_else(|| founded_year(raw, EMPLOYER_FOUNDED)),
        linkedin_url: employer
            .linkedin_url
            .or_else(|| raw.first_clean(EMPLOYER_LINKEDIN).map(ensure_scheme)),
    };

    (!company.is_empty()).then_some(company)
}

fn founded_year(raw: &RawRecord, paths: &[&str]) -> Option<i32> {
    raw.first_clean(paths)
        .and_then(|year| year.parse::<f64>().ok())
        .map(|year| year as i32)
}

fn first_listed_email(raw: &RawRecord) -> Option<String> {
    raw.array("emails").iter().find_map(|email| match email {
        Value::Object(_) => email
            .get("address")
            .or_else(|| email.get("email"))
            .and_then(clean_value),
        other => clean_value(other),
    })
}

fn linkedin_from_profiles(raw: &RawRecord) -> Option<String> {
    raw.array("profiles")
        .iter()
        .find(|profile| profile.get("network").and_then(Value::as_str) == Some("linkedin"))
        .and_then(|profile| profile.get("url"))
        .and_then(clean_value)
}

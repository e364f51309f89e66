use crate::config::DataSettings;
use crate::models::{Freelancer, Project, DAYS_PER_WEEK};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project id that maps to weekday 0 in the availability file
const FIRST_PROJECT_ID: u32 = 101;

/// Errors that can occur while ingesting CSV records
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("Capacity exceeded: more than {limit} {what}")]
    CapacityExceeded { what: &'static str, limit: usize },

    #[error("Duplicate {what} id {id} on line {line}")]
    DuplicateId {
        what: &'static str,
        id: u32,
        line: usize,
    },

    #[error("Record {record_id} lists {count} skills (limit {limit})")]
    TooManySkills {
        record_id: u32,
        count: usize,
        limit: usize,
    },
}

/// Bounds enforced at the ingestion boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestLimits {
    pub max_freelancers: usize,
    pub max_projects: usize,
    pub max_skills: usize,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_freelancers: 100,
            max_projects: 100,
            max_skills: 15,
        }
    }
}

/// CSV-backed source of freelancer and project records
///
/// Files are re-read on every call so edits show up on the next request.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    freelancers_path: PathBuf,
    projects_path: PathBuf,
    availability_path: PathBuf,
    limits: IngestLimits,
}

impl CsvDataset {
    pub fn new(
        freelancers_path: impl Into<PathBuf>,
        projects_path: impl Into<PathBuf>,
        availability_path: impl Into<PathBuf>,
        limits: IngestLimits,
    ) -> Self {
        Self {
            freelancers_path: freelancers_path.into(),
            projects_path: projects_path.into(),
            availability_path: availability_path.into(),
            limits,
        }
    }

    pub fn from_settings(settings: &DataSettings) -> Self {
        let dir = Path::new(&settings.dir);
        Self::new(
            dir.join(&settings.freelancers_file),
            dir.join(&settings.projects_file),
            dir.join(&settings.availability_file),
            settings.limits(),
        )
    }

    pub fn limits(&self) -> &IngestLimits {
        &self.limits
    }

    /// Load freelancers with their weekly availability applied
    ///
    /// A missing availability file leaves every freelancer unavailable.
    pub fn load_freelancers(&self) -> Result<Vec<Freelancer>, IngestError> {
        let mut freelancers = parse_freelancers(open(&self.freelancers_path)?, &self.limits)?;

        match File::open(&self.availability_path) {
            Ok(file) => {
                let applied = apply_availability(BufReader::new(file), &mut freelancers)?;
                tracing::debug!("Applied {} availability records", applied);
            }
            Err(e) => {
                tracing::warn!(
                    "Availability file {} unavailable ({}), defaulting to unavailable",
                    self.availability_path.display(),
                    e
                );
            }
        }

        tracing::info!("Loaded {} freelancers", freelancers.len());
        Ok(freelancers)
    }

    pub fn load_projects(&self) -> Result<Vec<Project>, IngestError> {
        let projects = parse_projects(open(&self.projects_path)?, &self.limits)?;
        tracing::info!("Loaded {} projects", projects.len());
        Ok(projects)
    }
}

fn open(path: &Path) -> Result<BufReader<File>, IngestError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Weekday index used by the availability file for a project id
///
/// Ids below the first project id have no weekday.
pub fn weekday_for_project(project_id: u32) -> Option<usize> {
    project_id
        .checked_sub(FIRST_PROJECT_ID)
        .map(|offset| offset as usize % DAYS_PER_WEEK)
}

/// Parse `id,name,skills,experience` records, skills separated by spaces
///
/// The first line is a header. Malformed records are skipped, a repeated
/// id is an error.
pub fn parse_freelancers<R: BufRead>(
    reader: R,
    limits: &IngestLimits,
) -> Result<Vec<Freelancer>, IngestError> {
    let mut freelancers = Vec::new();
    let mut seen = HashSet::new();

    for (line_no, line) in data_lines(reader) {
        let line = line?;
        let Some(freelancer) = parse_freelancer_line(&line) else {
            tracing::warn!("Skipping malformed freelancer record on line {}: {:?}", line_no, line);
            continue;
        };

        check_skill_count(freelancer.id, freelancer.skills.len(), limits)?;
        check_unique(&mut seen, "freelancer", freelancer.id, line_no)?;
        if freelancers.len() >= limits.max_freelancers {
            return Err(IngestError::CapacityExceeded {
                what: "freelancers",
                limit: limits.max_freelancers,
            });
        }
        freelancers.push(freelancer);
    }

    Ok(freelancers)
}

/// Parse `id,name,required_skills,min_experience,deadline_days` records
pub fn parse_projects<R: BufRead>(
    reader: R,
    limits: &IngestLimits,
) -> Result<Vec<Project>, IngestError> {
    let mut projects = Vec::new();
    let mut seen = HashSet::new();

    for (line_no, line) in data_lines(reader) {
        let line = line?;
        let Some(project) = parse_project_line(&line) else {
            tracing::warn!("Skipping malformed project record on line {}: {:?}", line_no, line);
            continue;
        };

        check_skill_count(project.id, project.required_skills.len(), limits)?;
        check_unique(&mut seen, "project", project.id, line_no)?;
        if projects.len() >= limits.max_projects {
            return Err(IngestError::CapacityExceeded {
                what: "projects",
                limit: limits.max_projects,
            });
        }
        projects.push(project);
    }

    Ok(projects)
}

/// Apply `freelancer_id,project_id,available` records
///
/// Returns how many records were applied. Unknown freelancers and project
/// ids without a weekday are ignored.
pub fn apply_availability<R: BufRead>(
    reader: R,
    freelancers: &mut [Freelancer],
) -> Result<usize, IngestError> {
    let mut applied = 0;

    for (line_no, line) in data_lines(reader) {
        let line = line?;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let parsed = match fields.as_slice() {
            [freelancer_id, project_id, available, ..] => freelancer_id
                .parse::<u32>()
                .ok()
                .zip(project_id.parse::<u32>().ok())
                .zip(available.parse::<i64>().ok()),
            _ => None,
        };

        let Some(((freelancer_id, project_id), available)) = parsed else {
            tracing::warn!("Skipping malformed availability record on line {}: {:?}", line_no, line);
            continue;
        };

        let Some(day) = weekday_for_project(project_id) else {
            continue;
        };

        if let Some(freelancer) = freelancers.iter_mut().find(|f| f.id == freelancer_id) {
            freelancer.availability[day] = available == 1;
            applied += 1;
        }
    }

    Ok(applied)
}

/// Non-blank lines after the header, numbered from 1
fn data_lines<R: BufRead>(reader: R) -> impl Iterator<Item = (usize, std::io::Result<String>)> {
    reader
        .lines()
        .enumerate()
        .skip(1)
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
}

fn check_skill_count(record_id: u32, count: usize, limits: &IngestLimits) -> Result<(), IngestError> {
    if count > limits.max_skills {
        return Err(IngestError::TooManySkills {
            record_id,
            count,
            limit: limits.max_skills,
        });
    }
    Ok(())
}

fn check_unique(seen: &mut HashSet<u32>, what: &'static str, id: u32, line: usize) -> Result<(), IngestError> {
    if !seen.insert(id) {
        return Err(IngestError::DuplicateId { what, id, line });
    }
    Ok(())
}

fn parse_freelancer_line(line: &str) -> Option<Freelancer> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [id, name, skills, experience, ..] = fields.as_slice() else {
        return None;
    };

    let id = parse_id(id)?;
    if name.is_empty() {
        return None;
    }

    Some(Freelancer {
        id,
        name: name.to_string(),
        skills: split_skills(skills),
        experience: experience.parse().ok()?,
        availability: [false; DAYS_PER_WEEK],
    })
}

fn parse_project_line(line: &str) -> Option<Project> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [id, name, skills, min_experience, deadline_days, ..] = fields.as_slice() else {
        return None;
    };

    let id = parse_id(id)?;
    if name.is_empty() {
        return None;
    }

    Some(Project {
        id,
        name: name.to_string(),
        required_skills: split_skills(skills),
        min_experience: min_experience.parse().ok()?,
        deadline_days: deadline_days.parse().ok()?,
    })
}

#[inline]
fn parse_id(field: &str) -> Option<u32> {
    field.parse::<u32>().ok().filter(|id| *id > 0)
}

#[inline]
fn split_skills(field: &str) -> Vec<String> {
    field.split_whitespace().map(str::to_string).collect()
}

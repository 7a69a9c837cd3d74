use std::collections::HashMap;

use crate::application::dto::applications::DuplicateGroupDto;
use crate::domain::applications::application::{Application, ApplicationStatus};

/// Groups non-draft applications by exact email and keeps groups of two or
/// more, largest first. Ties are ordered by email so the output is stable.
/// Within a group the input order is preserved.
pub fn group_by_email(applications: Vec<Application>) -> Vec<DuplicateGroupDto> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Application>> = HashMap::new();
    for app in applications {
        if app.status == ApplicationStatus::Draft {
            continue;
        }
        let bucket = groups.entry(app.email.clone()).or_insert_with(|| {
            order.push(app.email.clone());
            Vec::new()
        });
        bucket.push(app);
    }

    let mut out: Vec<DuplicateGroupDto> = order
        .into_iter()
        .filter_map(|email| {
            let applications = groups.remove(&email)?;
            (applications.len() >= 2).then_some(DuplicateGroupDto {
                email,
                applications,
            })
        })
        .collect();
    out.sort_by(|a, b| b.count().cmp(&a.count()).then_with(|| a.email.cmp(&b.email)));
    out
}

//! In-memory implementations of every port, used by unit tests in place of Postgres and S3.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::application::dto::contractors::ApplicationSummary;
use crate::application::ports::admin_repository::AdminRepository;
use crate::application::ports::application_repository::{
    ApplicationFields, ApplicationFilter, ApplicationPatch, ApplicationRepository, BatchOutcome,
    StatusUpdate,
};
use crate::application::ports::contractor_repository::{
    ContractorRepository, MergeOutcome, MergeResult,
};
use crate::application::ports::health_probe::HealthProbe;
use crate::application::ports::line_repository::{
    LinePatch, LineRepository, NewLine, ProvisionOutcome,
};
use crate::application::ports::tag_repository::{
    NewTag, TagDelete, TagPatch, TagRepository, TagWrite,
};
use crate::application::ports::upload_signer::{SignedUpload, UploadSigner};
use crate::application::services::passwords::hash_password;
use crate::domain::admins::admin::Admin;
use crate::domain::applications::application::{
    ApplicantType, Application, ApplicationStatus, ApplyType, PaymentStatus, VerificationStatus,
};
use crate::domain::contractors::contractor::{Contractor, NewContractor};
use crate::domain::lines::line::{Line, LineStatus, LineWithTags};
use crate::domain::tags::tag::{Tag, TagType};

/// A submitted individual application with plausible contact details.
pub fn application_fixture(email: &str) -> Application {
    let now = Utc::now();
    Application {
        id: Uuid::new_v4(),
        applicant_type: ApplicantType::Individual,
        apply_type: ApplyType::New,
        last_name: Some("Yamada".into()),
        first_name: Some("Taro".into()),
        last_name_kana: Some("ヤマダ".into()),
        first_name_kana: Some("タロウ".into()),
        date_of_birth: None,
        company_name: None,
        company_name_kana: None,
        corporate_number: None,
        established_date: None,
        representative_last_name: None,
        representative_first_name: None,
        representative_birth_date: None,
        contact_last_name: None,
        contact_first_name: None,
        email: email.to_string(),
        phone: "090-0000-0000".into(),
        postal_code: "100-0001".into(),
        address: "Tokyo".into(),
        mnp_reservation_number: None,
        mnp_expiry: None,
        current_carrier: None,
        plan_type: "3month-under50".into(),
        line_count: 1,
        total_amount: 4_600,
        id_card_front_url: None,
        id_card_back_url: None,
        registration_url: None,
        status: ApplicationStatus::Submitted,
        verification_status: VerificationStatus::Unverified,
        payment_status: PaymentStatus::NotIssued,
        comment1: None,
        comment2: None,
        expiration_date: None,
        password_hash: None,
        contractor_id: None,
        created_at: now,
        updated_at: now,
        submitted_at: Some(now),
    }
}

#[derive(Default)]
struct State {
    admins: Vec<Admin>,
    applications: Vec<Application>,
    lines: Vec<Line>,
    tags: Vec<Tag>,
    contractors: Vec<Contractor>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `app` with a creation time `age_secs` in the past so ordering is deterministic.
    pub fn seed_application(&self, mut app: Application, age_secs: i64) -> Application {
        let at = Utc::now() - Duration::seconds(age_secs);
        app.created_at = at;
        app.updated_at = at;
        self.state.lock().unwrap().applications.push(app.clone());
        app
    }

    pub fn seed_tag(&self, name: &str, tag_type: TagType) -> Tag {
        let now = Utc::now();
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            tag_type,
            color: None,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().tags.push(tag.clone());
        tag
    }

    pub fn seed_admin(&self, email: &str, password: &str) -> Admin {
        let admin = Admin {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Operator".into(),
            role: "admin".into(),
            password_hash: Some(hash_password(password).unwrap()),
            last_login_at: None,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().admins.push(admin.clone());
        admin
    }

    pub fn seed_contractor(&self, email: &str, password: Option<&str>) -> Contractor {
        let now = Utc::now();
        let c = Contractor {
            id: Uuid::new_v4(),
            email: email.to_string(),
            contractor_type: ApplicantType::Individual,
            last_name: Some("Sato".into()),
            first_name: Some("Hanako".into()),
            last_name_kana: None,
            first_name_kana: None,
            company_name: None,
            company_name_kana: None,
            corporate_number: None,
            phone: Some("080-1111-2222".into()),
            postal_code: Some("150-0001".into()),
            address: Some("Shibuya".into()),
            id_card_front_url: None,
            id_card_back_url: None,
            registration_url: None,
            expiration_date: None,
            password_hash: password.map(|p| hash_password(p).unwrap()),
            must_change_password: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().contractors.push(c.clone());
        c
    }

    pub fn seed_line(&self, application_id: Uuid, tags: (Option<Uuid>, Option<Uuid>)) -> Line {
        let now = Utc::now();
        let line = Line {
            id: Uuid::new_v4(),
            application_id,
            phone_number: None,
            iccid: None,
            line_status: LineStatus::NotOpened,
            shipment_date: None,
            return_date: None,
            contract_month: None,
            sim_location_id: tags.0,
            spare_tag_id: tags.1,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().lines.push(line.clone());
        line
    }

    pub fn application(&self, id: Uuid) -> Option<Application> {
        let st = self.state.lock().unwrap();
        st.applications.iter().find(|a| a.id == id).cloned()
    }

    pub fn line_count_for(&self, application_id: Uuid) -> usize {
        let st = self.state.lock().unwrap();
        st.lines
            .iter()
            .filter(|l| l.application_id == application_id)
            .count()
    }

    pub fn contractors(&self) -> Vec<Contractor> {
        self.state.lock().unwrap().contractors.clone()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.state.lock().unwrap().tags.clone()
    }

    pub fn admin(&self, id: Uuid) -> Option<Admin> {
        let st = self.state.lock().unwrap();
        st.admins.iter().find(|a| a.id == id).cloned()
    }
}

fn with_tags(st: &State, line: &Line) -> LineWithTags {
    let find = |id: Option<Uuid>| id.and_then(|id| st.tags.iter().find(|t| t.id == id).cloned());
    LineWithTags {
        line: line.clone(),
        sim_location: find(line.sim_location_id),
        spare_tag: find(line.spare_tag_id),
    }
}

fn apply_fields(app: &mut Application, f: &ApplicationFields) {
    macro_rules! set {
        ($($field:ident),+) => {
            $(if let Some(v) = &f.$field { app.$field = v.clone(); })+
        };
    }
    macro_rules! set_opt {
        ($($field:ident),+) => {
            $(if let Some(v) = &f.$field { app.$field = Some(v.clone()); })+
        };
    }
    set!(
        applicant_type,
        apply_type,
        email,
        phone,
        postal_code,
        address,
        plan_type,
        line_count,
        total_amount,
        status
    );
    set_opt!(
        last_name,
        first_name,
        last_name_kana,
        first_name_kana,
        date_of_birth,
        company_name,
        company_name_kana,
        corporate_number,
        established_date,
        representative_last_name,
        representative_first_name,
        representative_birth_date,
        contact_last_name,
        contact_first_name,
        mnp_reservation_number,
        mnp_expiry,
        current_carrier,
        id_card_front_url,
        id_card_back_url,
        registration_url,
        password_hash,
        contractor_id,
        submitted_at
    );
    app.updated_at = Utc::now();
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn insert(&self, fields: &ApplicationFields) -> anyhow::Result<Application> {
        let mut app = application_fixture("");
        app.last_name = None;
        app.first_name = None;
        app.last_name_kana = None;
        app.first_name_kana = None;
        app.phone = String::new();
        app.postal_code = String::new();
        app.address = String::new();
        app.plan_type = String::new();
        app.line_count = 0;
        app.total_amount = 0;
        app.status = ApplicationStatus::Draft;
        app.submitted_at = None;
        apply_fields(&mut app, fields);
        self.state.lock().unwrap().applications.push(app.clone());
        Ok(app)
    }

    async fn update_draft(
        &self,
        id: Uuid,
        fields: &ApplicationFields,
    ) -> anyhow::Result<Option<Application>> {
        let mut st = self.state.lock().unwrap();
        Ok(st
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.status == ApplicationStatus::Draft)
            .map(|a| {
                apply_fields(a, fields);
                a.clone()
            }))
    }

    async fn apply_patch(
        &self,
        id: Uuid,
        patch: &ApplicationPatch,
    ) -> anyhow::Result<Option<Application>> {
        let mut st = self.state.lock().unwrap();
        let Some(a) = st.applications.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.status {
            a.status = v;
        }
        if let Some(v) = patch.verification_status {
            a.verification_status = v;
        }
        if let Some(v) = patch.payment_status {
            a.payment_status = v;
        }
        if let Some(v) = &patch.comment1 {
            a.comment1 = v.clone();
        }
        if let Some(v) = &patch.comment2 {
            a.comment2 = v.clone();
        }
        if let Some(v) = patch.expiration_date {
            a.expiration_date = v;
        }
        if let Some(v) = &patch.plan_type {
            a.plan_type = v.clone();
        }
        if let Some(v) = patch.line_count {
            a.line_count = v;
        }
        if let Some(v) = patch.total_amount {
            a.total_amount = v;
        }
        if let Some(v) = &patch.email {
            a.email = v.clone();
        }
        if let Some(v) = &patch.phone {
            a.phone = v.clone();
        }
        if let Some(v) = &patch.postal_code {
            a.postal_code = v.clone();
        }
        if let Some(v) = &patch.address {
            a.address = v.clone();
        }
        a.updated_at = Utc::now();
        Ok(Some(a.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Application>> {
        Ok(self.application(id))
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Application>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .applications
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn latest_draft_for_email(&self, email: &str) -> anyhow::Result<Option<Application>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .applications
            .iter()
            .filter(|a| a.email == email && a.status == ApplicationStatus::Draft)
            .max_by_key(|a| a.updated_at)
            .cloned())
    }

    async fn latest_with_password_for_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<Application>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .applications
            .iter()
            .filter(|a| {
                a.email == email
                    && a.status != ApplicationStatus::Draft
                    && a.password_hash.is_some()
            })
            .max_by_key(|a| a.created_at)
            .cloned())
    }

    async fn list(&self, filter: &ApplicationFilter) -> anyhow::Result<(Vec<Application>, i64)> {
        let st = self.state.lock().unwrap();
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let contains = |v: &Option<String>, n: &str| {
            v.as_deref()
                .map(|s| s.to_lowercase().contains(n))
                .unwrap_or(false)
        };
        let mut rows: Vec<Application> = st
            .applications
            .iter()
            .filter(|a| filter.status.map(|s| a.status == s).unwrap_or(true))
            .filter(|a| match needle.as_deref() {
                None => true,
                Some(n) => {
                    contains(&a.last_name, n)
                        || contains(&a.first_name, n)
                        || contains(&a.company_name, n)
                        || a.email.to_lowercase().contains(n)
                        || a.phone.to_lowercase().contains(n)
                }
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = rows.len() as i64;
        let page = rows
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_non_draft(&self) -> anyhow::Result<Vec<Application>> {
        let st = self.state.lock().unwrap();
        let mut rows: Vec<Application> = st
            .applications
            .iter()
            .filter(|a| a.status != ApplicationStatus::Draft)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.email
                .cmp(&b.email)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    async fn list_for_contractor(&self, contractor_id: Uuid) -> anyhow::Result<Vec<Application>> {
        let st = self.state.lock().unwrap();
        let mut rows: Vec<Application> = st
            .applications
            .iter()
            .filter(|a| a.contractor_id == Some(contractor_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_non_draft_for_email(&self, email: &str) -> anyhow::Result<Vec<Application>> {
        let st = self.state.lock().unwrap();
        let mut rows: Vec<Application> = st
            .applications
            .iter()
            .filter(|a| a.email == email && a.status != ApplicationStatus::Draft)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn batch_update_statuses(
        &self,
        updates: &[StatusUpdate],
    ) -> anyhow::Result<BatchOutcome> {
        let mut st = self.state.lock().unwrap();
        if let Some(missing) = updates
            .iter()
            .find(|u| !st.applications.iter().any(|a| a.id == u.id))
        {
            return Ok(BatchOutcome::Missing(missing.id));
        }
        for u in updates {
            if let Some(a) = st.applications.iter_mut().find(|a| a.id == u.id) {
                if let Some(v) = u.verification_status {
                    a.verification_status = v;
                }
                if let Some(v) = u.payment_status {
                    a.payment_status = v;
                }
                a.updated_at = Utc::now();
            }
        }
        Ok(BatchOutcome::Applied(updates.len() as u64))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        Ok(match st.applications.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.password_hash = Some(password_hash.to_string());
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl LineRepository for InMemoryStore {
    async fn create(&self, new: &NewLine) -> anyhow::Result<Option<Line>> {
        let mut st = self.state.lock().unwrap();
        if !st.applications.iter().any(|a| a.id == new.application_id) {
            return Ok(None);
        }
        let now = Utc::now();
        let line = Line {
            id: Uuid::new_v4(),
            application_id: new.application_id,
            phone_number: new.phone_number.clone(),
            iccid: new.iccid.clone(),
            line_status: new.line_status,
            shipment_date: None,
            return_date: None,
            contract_month: None,
            sim_location_id: new.sim_location_id,
            spare_tag_id: new.spare_tag_id,
            created_at: now,
            updated_at: now,
        };
        st.lines.push(line.clone());
        Ok(Some(line))
    }

    async fn find_with_tags(&self, id: Uuid) -> anyhow::Result<Option<LineWithTags>> {
        let st = self.state.lock().unwrap();
        Ok(st
            .lines
            .iter()
            .find(|l| l.id == id)
            .map(|l| with_tags(&st, l)))
    }

    async fn list_for_application(
        &self,
        application_id: Uuid,
    ) -> anyhow::Result<Vec<LineWithTags>> {
        self.list_for_applications(&[application_id]).await
    }

    async fn list_for_applications(
        &self,
        application_ids: &[Uuid],
    ) -> anyhow::Result<Vec<LineWithTags>> {
        let st = self.state.lock().unwrap();
        let mut rows: Vec<LineWithTags> = st
            .lines
            .iter()
            .filter(|l| application_ids.contains(&l.application_id))
            .map(|l| with_tags(&st, l))
            .collect();
        rows.sort_by_key(|l| l.line.created_at);
        Ok(rows)
    }

    async fn update(&self, id: Uuid, patch: &LinePatch) -> anyhow::Result<Option<Line>> {
        let mut st = self.state.lock().unwrap();
        let Some(l) = st.lines.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &patch.phone_number {
            l.phone_number = v.clone();
        }
        if let Some(v) = &patch.iccid {
            l.iccid = v.clone();
        }
        if let Some(v) = patch.line_status {
            l.line_status = v;
        }
        if let Some(v) = patch.shipment_date {
            l.shipment_date = v;
        }
        if let Some(v) = patch.return_date {
            l.return_date = v;
        }
        if let Some(v) = &patch.contract_month {
            l.contract_month = v.clone();
        }
        if let Some(v) = patch.sim_location_id {
            l.sim_location_id = v;
        }
        if let Some(v) = patch.spare_tag_id {
            l.spare_tag_id = v;
        }
        l.updated_at = Utc::now();
        Ok(Some(l.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        let before = st.lines.len();
        st.lines.retain(|l| l.id != id);
        Ok(st.lines.len() < before)
    }

    async fn provision_for_application(
        &self,
        application_id: Uuid,
    ) -> anyhow::Result<Option<ProvisionOutcome>> {
        let mut st = self.state.lock().unwrap();
        let Some(target) = st
            .applications
            .iter()
            .find(|a| a.id == application_id)
            .map(|a| a.line_count.max(0) as u32)
        else {
            return Ok(None);
        };
        let existing = st
            .lines
            .iter()
            .filter(|l| l.application_id == application_id)
            .count() as u32;
        let missing = target.saturating_sub(existing);
        let now = Utc::now();
        for _ in 0..missing {
            st.lines.push(Line {
                id: Uuid::new_v4(),
                application_id,
                phone_number: None,
                iccid: None,
                line_status: LineStatus::NotOpened,
                shipment_date: None,
                return_date: None,
                contract_month: None,
                sim_location_id: None,
                spare_tag_id: None,
                created_at: now,
                updated_at: now,
            });
        }
        Ok(Some(ProvisionOutcome {
            created: missing,
            total: existing + missing,
        }))
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn list_tags(&self, tag_type: Option<TagType>) -> anyhow::Result<Vec<Tag>> {
        let st = self.state.lock().unwrap();
        let mut rows: Vec<Tag> = st
            .tags
            .iter()
            .filter(|t| tag_type.map(|tt| t.tag_type == tt).unwrap_or(true))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tag>> {
        let st = self.state.lock().unwrap();
        Ok(st.tags.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, tag: &NewTag) -> anyhow::Result<TagWrite> {
        let mut st = self.state.lock().unwrap();
        if st.tags.iter().any(|t| t.name == tag.name) {
            return Ok(TagWrite::NameTaken);
        }
        let now = Utc::now();
        let row = Tag {
            id: Uuid::new_v4(),
            name: tag.name.clone(),
            tag_type: tag.tag_type,
            color: tag.color.clone(),
            sort_order: tag.sort_order,
            created_at: now,
            updated_at: now,
        };
        st.tags.push(row.clone());
        Ok(TagWrite::Written(row))
    }

    async fn update(&self, id: Uuid, patch: &TagPatch) -> anyhow::Result<TagWrite> {
        let mut st = self.state.lock().unwrap();
        if let Some(name) = &patch.name {
            if st.tags.iter().any(|t| t.id != id && &t.name == name) {
                return Ok(TagWrite::NameTaken);
            }
        }
        let Some(t) = st.tags.iter_mut().find(|t| t.id == id) else {
            return Ok(TagWrite::NotFound);
        };
        if let Some(v) = &patch.name {
            t.name = v.clone();
        }
        if let Some(v) = patch.tag_type {
            t.tag_type = v;
        }
        if let Some(v) = &patch.color {
            t.color = v.clone();
        }
        if let Some(v) = patch.sort_order {
            t.sort_order = v;
        }
        t.updated_at = Utc::now();
        Ok(TagWrite::Written(t.clone()))
    }

    async fn usage_count(&self, id: Uuid) -> anyhow::Result<i64> {
        let st = self.state.lock().unwrap();
        Ok(st
            .lines
            .iter()
            .filter(|l| l.sim_location_id == Some(id) || l.spare_tag_id == Some(id))
            .count() as i64)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<TagDelete> {
        let mut st = self.state.lock().unwrap();
        let referenced = st
            .lines
            .iter()
            .any(|l| l.sim_location_id == Some(id) || l.spare_tag_id == Some(id));
        if referenced {
            return Ok(TagDelete::InUse);
        }
        let before = st.tags.len();
        st.tags.retain(|t| t.id != id);
        Ok(if st.tags.len() < before {
            TagDelete::Deleted
        } else {
            TagDelete::NotFound
        })
    }
}

#[async_trait]
impl ContractorRepository for InMemoryStore {
    async fn list_with_applications(
        &self,
    ) -> anyhow::Result<Vec<(Contractor, Vec<ApplicationSummary>)>> {
        let st = self.state.lock().unwrap();
        let mut rows: Vec<(Contractor, Vec<ApplicationSummary>)> = st
            .contractors
            .iter()
            .map(|c| {
                let apps = st
                    .applications
                    .iter()
                    .filter(|a| a.contractor_id == Some(c.id))
                    .map(|a| ApplicationSummary {
                        id: a.id,
                        status: a.status,
                        plan_type: a.plan_type.clone(),
                        line_count: a.line_count,
                        created_at: a.created_at,
                    })
                    .collect();
                (c.clone(), apps)
            })
            .collect();
        rows.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Contractor>> {
        let st = self.state.lock().unwrap();
        Ok(st.contractors.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Contractor>> {
        let st = self.state.lock().unwrap();
        Ok(st.contractors.iter().find(|c| c.email == email).cloned())
    }

    async fn merge_applications(
        &self,
        seed: &NewContractor,
        application_ids: &[Uuid],
    ) -> anyhow::Result<MergeResult> {
        let mut st = self.state.lock().unwrap();
        let selected: Vec<&Application> = st
            .applications
            .iter()
            .filter(|a| application_ids.contains(&a.id))
            .collect();
        if selected.len() != application_ids.len() {
            return Ok(MergeResult::Missing);
        }
        if selected.iter().any(|a| a.email != seed.email) {
            return Ok(MergeResult::EmailChanged);
        }
        let existing = st
            .contractors
            .iter()
            .find(|c| c.email == seed.email)
            .map(|c| c.id);
        let (contractor_id, created) = match existing {
            Some(id) => (id, false),
            None => {
                let now = Utc::now();
                let c = Contractor {
                    id: Uuid::new_v4(),
                    email: seed.email.clone(),
                    contractor_type: seed.contractor_type,
                    last_name: seed.last_name.clone(),
                    first_name: seed.first_name.clone(),
                    last_name_kana: seed.last_name_kana.clone(),
                    first_name_kana: seed.first_name_kana.clone(),
                    company_name: seed.company_name.clone(),
                    company_name_kana: seed.company_name_kana.clone(),
                    corporate_number: seed.corporate_number.clone(),
                    phone: seed.phone.clone(),
                    postal_code: seed.postal_code.clone(),
                    address: seed.address.clone(),
                    id_card_front_url: seed.id_card_front_url.clone(),
                    id_card_back_url: seed.id_card_back_url.clone(),
                    registration_url: seed.registration_url.clone(),
                    expiration_date: seed.expiration_date,
                    password_hash: seed.password_hash.clone(),
                    must_change_password: seed.must_change_password,
                    last_login_at: None,
                    created_at: now,
                    updated_at: now,
                };
                let id = c.id;
                st.contractors.push(c);
                (id, true)
            }
        };
        let mut updated = 0;
        for a in st
            .applications
            .iter_mut()
            .filter(|a| application_ids.contains(&a.id))
        {
            a.contractor_id = Some(contractor_id);
            updated += 1;
        }
        Ok(MergeResult::Merged(MergeOutcome {
            contractor_id,
            created,
            updated_applications: updated,
        }))
    }

    async fn set_password(
        &self,
        id: Uuid,
        password_hash: &str,
        must_change_password: bool,
    ) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        Ok(match st.contractors.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.password_hash = Some(password_hash.to_string());
                c.must_change_password = must_change_password;
                true
            }
            None => false,
        })
    }

    async fn touch_last_login(&self, id: Uuid) -> anyhow::Result<()> {
        let mut st = self.state.lock().unwrap();
        if let Some(c) = st.contractors.iter_mut().find(|c| c.id == id) {
            c.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl AdminRepository for InMemoryStore {
    async fn create_admin(
        &self,
        email: &str,
        name: &str,
        role: &str,
        password_hash: &str,
    ) -> anyhow::Result<Admin> {
        let admin = Admin {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            password_hash: Some(password_hash.to_string()),
            last_login_at: None,
            created_at: Utc::now(),
        };
        let mut st = self.state.lock().unwrap();
        anyhow::ensure!(
            !st.admins.iter().any(|a| a.email == email),
            "admin email already exists"
        );
        st.admins.push(admin.clone());
        Ok(admin)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Admin>> {
        let st = self.state.lock().unwrap();
        Ok(st.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Admin>> {
        Ok(self.admin(id))
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> anyhow::Result<bool> {
        let mut st = self.state.lock().unwrap();
        Ok(match st.admins.iter_mut().find(|a| a.email == email) {
            Some(a) => {
                a.password_hash = Some(password_hash.to_string());
                true
            }
            None => false,
        })
    }

    async fn touch_last_login(&self, id: Uuid) -> anyhow::Result<()> {
        let mut st = self.state.lock().unwrap();
        if let Some(a) = st.admins.iter_mut().find(|a| a.id == id) {
            a.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

/// Reports whatever readiness it was built with.
pub struct FixedProbe(pub bool);

#[async_trait]
impl HealthProbe for FixedProbe {
    async fn database_ready(&self) -> bool {
        self.0
    }
}

/// Signs nothing; returns predictable URLs derived from the key.
pub struct FakeSigner;

#[async_trait]
impl UploadSigner for FakeSigner {
    async fn sign_put(
        &self,
        key: &str,
        _content_type: Option<&str>,
    ) -> anyhow::Result<SignedUpload> {
        Ok(SignedUpload {
            signed_url: format!("https://storage.test/upload/{key}?sig=fake"),
            public_url: format!("https://storage.test/public/{key}"),
            expires_in_secs: 3600,
        })
    }
}

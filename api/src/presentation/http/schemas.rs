//! JSON shapes shared by several route groups. Password hashes never leave
//! this layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::dto::applications::ApplicationWithLines;
use crate::application::dto::contractors::{ApplicationSummary, ContractorWithApplicationsDto};
use crate::domain::admins::admin::Admin;
use crate::domain::applications::application::{
    ApplicantType, Application, ApplicationStatus, ApplyType, PaymentStatus, VerificationStatus,
};
use crate::domain::contractors::contractor::Contractor;
use crate::domain::lines::line::{LineStatus, LineWithTags};
use crate::domain::tags::tag::{Tag, TagType};

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessMessage {
    pub success: bool,
    pub message: String,
}

impl SuccessMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<Admin> for AdminView {
    fn from(a: Admin) -> Self {
        AdminView {
            id: a.id,
            email: a.email,
            name: a.name,
            role: a.role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagView {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: TagType,
    pub color: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Tag> for TagView {
    fn from(t: Tag) -> Self {
        TagView {
            id: t.id,
            name: t.name,
            tag_type: t.tag_type,
            color: t.color,
            order: t.sort_order,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    pub id: Uuid,
    pub application_id: Uuid,
    pub phone_number: Option<String>,
    pub iccid: Option<String>,
    pub line_status: LineStatus,
    pub shipment_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub contract_month: Option<String>,
    pub sim_location_id: Option<Uuid>,
    pub spare_tag_id: Option<Uuid>,
    pub sim_location: Option<TagView>,
    pub spare_tag: Option<TagView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<Box<ApplicationView>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LineWithTags> for LineView {
    fn from(l: LineWithTags) -> Self {
        let line = l.line;
        LineView {
            id: line.id,
            application_id: line.application_id,
            phone_number: line.phone_number,
            iccid: line.iccid,
            line_status: line.line_status,
            shipment_date: line.shipment_date,
            return_date: line.return_date,
            contract_month: line.contract_month,
            sim_location_id: line.sim_location_id,
            spare_tag_id: line.spare_tag_id,
            sim_location: l.sim_location.map(Into::into),
            spare_tag: l.spare_tag.map(Into::into),
            application: None,
            created_at: line.created_at,
            updated_at: line.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: Uuid,
    pub applicant_type: ApplicantType,
    pub apply_type: ApplyType,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub company_name: Option<String>,
    pub company_name_kana: Option<String>,
    pub corporate_number: Option<String>,
    pub established_date: Option<NaiveDate>,
    pub representative_last_name: Option<String>,
    pub representative_first_name: Option<String>,
    pub representative_birth_date: Option<NaiveDate>,
    pub contact_last_name: Option<String>,
    pub contact_first_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub postal_code: String,
    pub address: String,
    pub mnp_reservation_number: Option<String>,
    pub mnp_expiry: Option<NaiveDate>,
    pub current_carrier: Option<String>,
    pub plan_type: String,
    pub line_count: i32,
    pub total_amount: i64,
    pub id_card_front_url: Option<String>,
    pub id_card_back_url: Option<String>,
    pub registration_url: Option<String>,
    pub status: ApplicationStatus,
    pub verification_status: VerificationStatus,
    pub payment_status: PaymentStatus,
    pub comment1: Option<String>,
    pub comment2: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub has_password: bool,
    pub contractor_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<LineView>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl From<Application> for ApplicationView {
    fn from(a: Application) -> Self {
        ApplicationView {
            id: a.id,
            applicant_type: a.applicant_type,
            apply_type: a.apply_type,
            last_name: a.last_name,
            first_name: a.first_name,
            last_name_kana: a.last_name_kana,
            first_name_kana: a.first_name_kana,
            date_of_birth: a.date_of_birth,
            company_name: a.company_name,
            company_name_kana: a.company_name_kana,
            corporate_number: a.corporate_number,
            established_date: a.established_date,
            representative_last_name: a.representative_last_name,
            representative_first_name: a.representative_first_name,
            representative_birth_date: a.representative_birth_date,
            contact_last_name: a.contact_last_name,
            contact_first_name: a.contact_first_name,
            email: a.email,
            phone: a.phone,
            postal_code: a.postal_code,
            address: a.address,
            mnp_reservation_number: a.mnp_reservation_number,
            mnp_expiry: a.mnp_expiry,
            current_carrier: a.current_carrier,
            plan_type: a.plan_type,
            line_count: a.line_count,
            total_amount: a.total_amount,
            id_card_front_url: a.id_card_front_url,
            id_card_back_url: a.id_card_back_url,
            registration_url: a.registration_url,
            status: a.status,
            verification_status: a.verification_status,
            payment_status: a.payment_status,
            comment1: a.comment1,
            comment2: a.comment2,
            expiration_date: a.expiration_date,
            has_password: a.password_hash.is_some(),
            contractor_id: a.contractor_id,
            lines: None,
            created_at: a.created_at,
            updated_at: a.updated_at,
            submitted_at: a.submitted_at,
        }
    }
}

impl From<ApplicationWithLines> for ApplicationView {
    fn from(a: ApplicationWithLines) -> Self {
        ApplicationView {
            lines: Some(a.lines.into_iter().map(Into::into).collect()),
            ..a.application.into()
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractorView {
    pub id: Uuid,
    pub email: String,
    pub contractor_type: ApplicantType,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub company_name: Option<String>,
    pub company_name_kana: Option<String>,
    pub corporate_number: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
    pub id_card_front_url: Option<String>,
    pub id_card_back_url: Option<String>,
    pub registration_url: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub has_password: bool,
    pub must_change_password: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contractor> for ContractorView {
    fn from(c: Contractor) -> Self {
        ContractorView {
            id: c.id,
            email: c.email,
            contractor_type: c.contractor_type,
            last_name: c.last_name,
            first_name: c.first_name,
            last_name_kana: c.last_name_kana,
            first_name_kana: c.first_name_kana,
            company_name: c.company_name,
            company_name_kana: c.company_name_kana,
            corporate_number: c.corporate_number,
            phone: c.phone,
            postal_code: c.postal_code,
            address: c.address,
            id_card_front_url: c.id_card_front_url,
            id_card_back_url: c.id_card_back_url,
            registration_url: c.registration_url,
            expiration_date: c.expiration_date,
            has_password: c.password_hash.is_some(),
            must_change_password: c.must_change_password,
            last_login_at: c.last_login_at,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummaryView {
    pub id: Uuid,
    pub status: ApplicationStatus,
    pub plan_type: String,
    pub line_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ApplicationSummary> for ApplicationSummaryView {
    fn from(s: ApplicationSummary) -> Self {
        ApplicationSummaryView {
            id: s.id,
            status: s.status,
            plan_type: s.plan_type,
            line_count: s.line_count,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractorWithApplicationsView {
    #[serde(flatten)]
    pub contractor: ContractorView,
    pub applications: Vec<ApplicationSummaryView>,
    pub application_count: usize,
}

impl From<ContractorWithApplicationsDto> for ContractorWithApplicationsView {
    fn from(d: ContractorWithApplicationsDto) -> Self {
        ContractorWithApplicationsView {
            contractor: d.contractor.into(),
            application_count: d.applications.len(),
            applications: d.applications.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::application_fixture;

    #[test]
    fn application_view_hides_password_hash() {
        let mut app = application_fixture("a@example.com");
        app.password_hash = Some("$argon2id$secret".into());
        let json = serde_json::to_value(ApplicationView::from(app)).unwrap();
        assert_eq!(json["hasPassword"], true);
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("lines").is_none());
        assert_eq!(json["planType"], "3month-under50");
        assert_eq!(json["verificationStatus"], "unverified");
    }
}

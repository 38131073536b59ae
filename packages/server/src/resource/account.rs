//! Records hanging off a member account: shipping addresses, point ledger and
//! notification preferences, plus partner companies.

use backoffice_common::schema::FormMode;
use backoffice_common::validation::CharClass;
use backoffice_common::{Rule, Schema, date};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::{FileDto, NewRow, Resource, clean, default_true, entity_columns};
use crate::entity::{address, company, point, setting};
use crate::store::StoreError;

const PHONE_CHARS: &[CharClass] = &[CharClass::Digit];

fn phone_rules() -> [Rule; 2] {
    [Rule::max_length(20), Rule::only(PHONE_CHARS, "-+ ")]
}

pub struct Addresses;

#[derive(Debug, Deserialize)]
pub struct AddressForm {
    pub user_uid: String,
    pub label: String,
    pub recipient: String,
    pub phone: String,
    pub zipcode: String,
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
pub struct AddressDto {
    pub idx: i32,
    pub uid: String,
    pub user_uid: String,
    pub label: String,
    pub recipient: String,
    pub phone: String,
    pub zipcode: String,
    pub address1: String,
    pub address2: Option<String>,
    pub is_default: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Addresses {
    entity_columns!(address);

    type Form = AddressForm;
    type Dto = AddressDto;

    const NAME: &'static str = "address";

    fn search_columns() -> Vec<Self::Column> {
        vec![
            address::Column::Recipient,
            address::Column::Address1,
            address::Column::Label,
        ]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![("user_uid", address::Column::UserUid)]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("user_uid", [Rule::required(), Rule::max_length(64)])
            .field("label", [Rule::required(), Rule::max_length(30)])
            .field("recipient", [Rule::required(), Rule::max_length(50)])
            .field(
                "phone",
                std::iter::once(Rule::required()).chain(phone_rules()),
            )
            .field(
                "zipcode",
                [
                    Rule::required(),
                    Rule::max_length(10),
                    Rule::only(PHONE_CHARS, "-"),
                ],
            )
            .field("address1", [Rule::required(), Rule::max_length(200)])
            .field("address2", [Rule::max_length(200)])
            .field("is_default", [Rule::boolean()])
    }

    fn create(form: AddressForm, row: NewRow) -> Result<address::ActiveModel, StoreError> {
        Ok(address::ActiveModel {
            uid: Set(row.uid),
            user_uid: Set(form.user_uid.trim().to_string()),
            label: Set(form.label.trim().to_string()),
            recipient: Set(form.recipient.trim().to_string()),
            phone: Set(form.phone.trim().to_string()),
            zipcode: Set(form.zipcode.trim().to_string()),
            address1: Set(form.address1.trim().to_string()),
            address2: Set(clean(form.address2)),
            is_default: Set(form.is_default),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut address::ActiveModel,
        form: AddressForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.user_uid = Set(form.user_uid.trim().to_string());
        active.label = Set(form.label.trim().to_string());
        active.recipient = Set(form.recipient.trim().to_string());
        active.phone = Set(form.phone.trim().to_string());
        active.zipcode = Set(form.zipcode.trim().to_string());
        active.address1 = Set(form.address1.trim().to_string());
        active.address2 = Set(clean(form.address2));
        active.is_default = Set(form.is_default);
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: address::Model, _files: Vec<FileDto>) -> AddressDto {
        AddressDto {
            idx: m.idx,
            uid: m.uid,
            user_uid: m.user_uid,
            label: m.label,
            recipient: m.recipient,
            phone: m.phone,
            zipcode: m.zipcode,
            address1: m.address1,
            address2: m.address2,
            is_default: m.is_default,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

pub struct Companies;

#[derive(Debug, Deserialize)]
pub struct CompanyForm {
    pub name: String,
    pub business_number: String,
    pub ceo_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyDto {
    pub idx: i32,
    pub uid: String,
    pub name: String,
    pub business_number: String,
    pub ceo_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Companies {
    entity_columns!(company);

    type Form = CompanyForm;
    type Dto = CompanyDto;

    const NAME: &'static str = "company";

    fn search_columns() -> Vec<Self::Column> {
        vec![company::Column::Name, company::Column::BusinessNumber]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("name", [Rule::required(), Rule::max_length(100)])
            .field(
                "business_number",
                [
                    Rule::required(),
                    Rule::max_length(20),
                    Rule::only(PHONE_CHARS, "-"),
                ],
            )
            .field("ceo_name", [Rule::required(), Rule::max_length(50)])
            .field("phone", phone_rules())
            .field("email", [Rule::email(), Rule::max_length(255)])
            .field("address", [Rule::max_length(300)])
    }

    fn create(form: CompanyForm, row: NewRow) -> Result<company::ActiveModel, StoreError> {
        Ok(company::ActiveModel {
            uid: Set(row.uid),
            name: Set(form.name.trim().to_string()),
            business_number: Set(form.business_number.trim().to_string()),
            ceo_name: Set(form.ceo_name.trim().to_string()),
            phone: Set(clean(form.phone)),
            email: Set(clean(form.email)),
            address: Set(clean(form.address)),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut company::ActiveModel,
        form: CompanyForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.name = Set(form.name.trim().to_string());
        active.business_number = Set(form.business_number.trim().to_string());
        active.ceo_name = Set(form.ceo_name.trim().to_string());
        active.phone = Set(clean(form.phone));
        active.email = Set(clean(form.email));
        active.address = Set(clean(form.address));
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: company::Model, _files: Vec<FileDto>) -> CompanyDto {
        CompanyDto {
            idx: m.idx,
            uid: m.uid,
            name: m.name,
            business_number: m.business_number,
            ceo_name: m.ceo_name,
            phone: m.phone,
            email: m.email,
            address: m.address,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

/// Point ledger entries. Positive amounts grant points, negative ones spend them.
pub struct Points;

#[derive(Debug, Deserialize)]
pub struct PointForm {
    pub user_uid: String,
    pub amount: i64,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct PointDto {
    pub idx: i32,
    pub uid: String,
    pub user_uid: String,
    pub amount: i64,
    pub reason: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Points {
    entity_columns!(point);

    type Form = PointForm;
    type Dto = PointDto;

    const NAME: &'static str = "point";

    fn search_columns() -> Vec<Self::Column> {
        vec![point::Column::Reason]
    }

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![("user_uid", point::Column::UserUid)]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("user_uid", [Rule::required(), Rule::max_length(64)])
            .field(
                "amount",
                [
                    Rule::required(),
                    Rule::range(Some(-10_000_000), Some(10_000_000)),
                ],
            )
            .field("reason", [Rule::required(), Rule::max_length(200)])
    }

    fn create(form: PointForm, row: NewRow) -> Result<point::ActiveModel, StoreError> {
        Ok(point::ActiveModel {
            uid: Set(row.uid),
            user_uid: Set(form.user_uid.trim().to_string()),
            amount: Set(form.amount),
            reason: Set(form.reason.trim().to_string()),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut point::ActiveModel,
        form: PointForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.user_uid = Set(form.user_uid.trim().to_string());
        active.amount = Set(form.amount);
        active.reason = Set(form.reason.trim().to_string());
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: point::Model, _files: Vec<FileDto>) -> PointDto {
        PointDto {
            idx: m.idx,
            uid: m.uid,
            user_uid: m.user_uid,
            amount: m.amount,
            reason: m.reason,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

/// Per-user notification preferences.
pub struct Settings;

#[derive(Debug, Deserialize)]
pub struct SettingForm {
    pub user_uid: String,
    #[serde(default = "default_true")]
    pub push_enabled: bool,
    #[serde(default = "default_true")]
    pub email_enabled: bool,
    #[serde(default)]
    pub marketing_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct SettingDto {
    pub idx: i32,
    pub uid: String,
    pub user_uid: String,
    pub push_enabled: bool,
    pub email_enabled: bool,
    pub marketing_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Resource for Settings {
    entity_columns!(setting);

    type Form = SettingForm;
    type Dto = SettingDto;

    const NAME: &'static str = "setting";

    fn filters() -> Vec<(&'static str, Self::Column)> {
        vec![("user_uid", setting::Column::UserUid)]
    }

    fn schema(_mode: FormMode) -> Schema {
        Schema::new()
            .field("user_uid", [Rule::required(), Rule::max_length(64)])
            .field("push_enabled", [Rule::boolean()])
            .field("email_enabled", [Rule::boolean()])
            .field("marketing_enabled", [Rule::boolean()])
    }

    fn create(form: SettingForm, row: NewRow) -> Result<setting::ActiveModel, StoreError> {
        Ok(setting::ActiveModel {
            uid: Set(row.uid),
            user_uid: Set(form.user_uid.trim().to_string()),
            push_enabled: Set(form.push_enabled),
            email_enabled: Set(form.email_enabled),
            marketing_enabled: Set(form.marketing_enabled),
            is_use: Set(true),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        })
    }

    fn update(
        active: &mut setting::ActiveModel,
        form: SettingForm,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        active.user_uid = Set(form.user_uid.trim().to_string());
        active.push_enabled = Set(form.push_enabled);
        active.email_enabled = Set(form.email_enabled);
        active.marketing_enabled = Set(form.marketing_enabled);
        active.updated_at = Set(now);
        Ok(())
    }

    fn to_dto(m: setting::Model, _files: Vec<FileDto>) -> SettingDto {
        SettingDto {
            idx: m.idx,
            uid: m.uid,
            user_uid: m.user_uid,
            push_enabled: m.push_enabled,
            email_enabled: m.email_enabled,
            marketing_enabled: m.marketing_enabled,
            created_at: date::format_datetime(&m.created_at),
            updated_at: date::format_datetime(&m.updated_at),
        }
    }
}

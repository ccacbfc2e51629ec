use std::rc::Rc;

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, FormData, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::api;
use crate::components::{
    photo_url, upload_name, Modal, PhotoUpload, INPUT_CLASS, LABEL_CLASS, PRIMARY_BUTTON,
    SECONDARY_BUTTON,
};
use crate::config::{api_base_url, BrowserStorage};
use crate::dates::{input_value, today};
use crate::dialogs;
use crate::error::ValidationError;
use crate::models::{Group, StudentDetail, Tariff};
use crate::names::{build_full_name, split_full_name};

pub const STATUSES: [(&str, &str); 3] = [
    ("active", "Active"),
    ("inactive", "Inactive"),
    ("blacklist", "Blacklist"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    LastName,
    FirstName,
    MiddleName,
    StudentNumber,
    SchoolNumber,
    Phone,
    ParentPhone,
    City,
    District,
    Street,
    HouseNumber,
    BirthYear,
    PassportSeries,
    PassportNumber,
    PassportIssuedBy,
    PassportIssueDate,
    PassportExpiryDate,
    AdmissionDate,
    GroupId,
    TariffId,
    Status,
    BlacklistReason,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentForm {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub student_number: String,
    pub school_number: String,
    pub phone: String,
    pub parent_phone: String,
    pub city: String,
    pub district: String,
    pub street: String,
    pub house_number: String,
    pub birth_year: String,
    pub passport_series: String,
    pub passport_number: String,
    pub passport_issued_by: String,
    pub passport_issue_date: String,
    pub passport_expiry_date: String,
    pub admission_date: String,
    pub group_id: String,
    pub tariff_id: String,
    pub status: String,
    pub blacklist_reason: String,
    pub club_funded: bool,
}

pub enum FormAction {
    Set(Field, String),
    SetClubFunded(bool),
    Load(StudentDetail),
}

impl Reducible for StudentForm {
    type Action = FormAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            FormAction::Set(Field::City, value) => {
                if next.city != value {
                    next.district.clear();
                }
                next.city = value;
            }
            FormAction::Set(field, value) => *next.field_mut(field) = value,
            FormAction::SetClubFunded(value) => next.club_funded = value,
            FormAction::Load(detail) => next = StudentForm::from_detail(&detail),
        }
        Rc::new(next)
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn date_text(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(|raw| raw.chars().take(10).collect())
        .unwrap_or_default()
}

impl StudentForm {
    pub fn new(admission: &str) -> Self {
        Self {
            admission_date: admission.to_string(),
            status: "active".to_string(),
            ..Self::default()
        }
    }

    pub fn from_detail(detail: &StudentDetail) -> Self {
        let name = split_full_name(detail.full_name.as_deref().unwrap_or_default());
        Self {
            last_name: name.last,
            first_name: name.first,
            middle_name: name.middle,
            student_number: text(&detail.student_number),
            school_number: text(&detail.school_number),
            phone: text(&detail.phone),
            parent_phone: text(&detail.parent_phone),
            city: text(&detail.city),
            district: text(&detail.district),
            street: text(&detail.street),
            house_number: text(&detail.house_number),
            birth_year: detail.birth_year.map(|y| y.to_string()).unwrap_or_default(),
            passport_series: text(&detail.passport_series),
            passport_number: text(&detail.passport_number),
            passport_issued_by: text(&detail.passport_issued_by),
            passport_issue_date: date_text(&detail.passport_issue_date),
            passport_expiry_date: date_text(&detail.passport_expiry_date),
            admission_date: date_text(&detail.admission_date),
            group_id: detail.group_id.map(|id| id.to_string()).unwrap_or_default(),
            tariff_id: detail.tariff_id.map(|id| id.to_string()).unwrap_or_default(),
            status: detail.status.clone().unwrap_or_else(|| "active".to_string()),
            blacklist_reason: text(&detail.blacklist_reason),
            club_funded: detail.club_funded.unwrap_or(false),
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::LastName => &mut self.last_name,
            Field::FirstName => &mut self.first_name,
            Field::MiddleName => &mut self.middle_name,
            Field::StudentNumber => &mut self.student_number,
            Field::SchoolNumber => &mut self.school_number,
            Field::Phone => &mut self.phone,
            Field::ParentPhone => &mut self.parent_phone,
            Field::City => &mut self.city,
            Field::District => &mut self.district,
            Field::Street => &mut self.street,
            Field::HouseNumber => &mut self.house_number,
            Field::BirthYear => &mut self.birth_year,
            Field::PassportSeries => &mut self.passport_series,
            Field::PassportNumber => &mut self.passport_number,
            Field::PassportIssuedBy => &mut self.passport_issued_by,
            Field::PassportIssueDate => &mut self.passport_issue_date,
            Field::PassportExpiryDate => &mut self.passport_expiry_date,
            Field::AdmissionDate => &mut self.admission_date,
            Field::GroupId => &mut self.group_id,
            Field::TariffId => &mut self.tariff_id,
            Field::Status => &mut self.status,
            Field::BlacklistReason => &mut self.blacklist_reason,
        }
    }

    pub fn full_name(&self) -> String {
        build_full_name(&self.last_name, &self.first_name, &self.middle_name)
    }

    pub fn is_blacklisted(&self) -> bool {
        self.status == "blacklist"
    }

    /// A photo is mandatory only when creating a student.
    pub fn validate(&self, creating: bool, has_photo: bool) -> Result<(), ValidationError> {
        if self.last_name.trim().is_empty()
            || self.first_name.trim().is_empty()
            || self.student_number.trim().is_empty()
        {
            return Err(ValidationError::MissingFields);
        }
        let birth_year = self.birth_year.trim();
        if !birth_year.is_empty() && birth_year.parse::<i32>().is_err() {
            return Err(ValidationError::Rule("Birth year must be a number"));
        }
        if creating && !has_photo {
            return Err(ValidationError::Rule("Please add a student photo"));
        }
        Ok(())
    }

    /// Multipart text fields, in the order the backend reads them.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let reason = if self.is_blacklisted() {
            self.blacklist_reason.trim().to_string()
        } else {
            String::new()
        };
        vec![
            ("full_name", self.full_name()),
            ("student_number", self.student_number.trim().to_string()),
            ("school_number", self.school_number.trim().to_string()),
            ("phone", self.phone.trim().to_string()),
            ("parent_phone", self.parent_phone.trim().to_string()),
            ("group_id", self.group_id.clone()),
            ("tariff_id", self.tariff_id.clone()),
            ("city", self.city.clone()),
            ("district", self.district.clone()),
            ("street", self.street.trim().to_string()),
            ("house_number", self.house_number.trim().to_string()),
            ("birth_year", self.birth_year.trim().to_string()),
            ("passport_series", self.passport_series.trim().to_string()),
            ("passport_number", self.passport_number.trim().to_string()),
            ("passport_issued_by", self.passport_issued_by.trim().to_string()),
            ("passport_issue_date", self.passport_issue_date.clone()),
            ("passport_expiry_date", self.passport_expiry_date.clone()),
            ("admission_date", self.admission_date.clone()),
            ("club_funded", self.club_funded.to_string()),
            ("status", self.status.clone()),
            ("blacklist_reason", reason),
        ]
    }
}

fn to_form_data(form: &StudentForm, photo: Option<&File>) -> Result<FormData, JsValue> {
    let data = FormData::new()?;
    for (name, value) in form.entries() {
        data.append_with_str(name, &value)?;
    }
    if let Some(file) = photo {
        data.append_with_blob_and_filename("photo", file, upload_name(&file.name()))?;
    }
    Ok(data)
}

#[derive(Properties, PartialEq)]
pub struct StudentFormModalProps {
    /// `None` opens the modal for a new student.
    #[prop_or_default]
    pub student_id: Option<i64>,
    pub groups: Vec<Group>,
    pub tariffs: Vec<Tariff>,
    pub on_close: Callback<()>,
    pub on_saved: Callback<()>,
}

#[function_component(StudentFormModal)]
pub fn student_form_modal(props: &StudentFormModalProps) -> Html {
    let form = use_reducer(|| StudentForm::new(&input_value(today())));
    let photo = use_state(|| None::<File>);
    let existing_photo = use_state(|| None::<String>);
    let loaded = use_state(|| props.student_id.is_none());
    let cities = use_state(Vec::<String>::new);
    let districts = use_state(Vec::<String>::new);
    let saving = use_state(|| false);

    {
        let cities = cities.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_cities().await {
                        Ok(list) => cities.set(list),
                        Err(err) => log::warn!("could not load cities: {}", err),
                    }
                });
                || ()
            },
            (),
        );
    }

    {
        let form = form.clone();
        let existing_photo = existing_photo.clone();
        let loaded = loaded.clone();
        use_effect_with_deps(
            move |student_id: &Option<i64>| {
                if let Some(id) = *student_id {
                    spawn_local(async move {
                        match api::fetch_student(id).await {
                            Ok(detail) => {
                                existing_photo.set(
                                    detail
                                        .photo_path
                                        .as_deref()
                                        .filter(|p| !p.is_empty())
                                        .map(|p| photo_url(&api_base_url(&BrowserStorage), p)),
                                );
                                form.dispatch(FormAction::Load(detail));
                                loaded.set(true);
                            }
                            Err(err) => dialogs::report("loading student", err),
                        }
                    });
                }
                || ()
            },
            props.student_id,
        );
    }

    {
        let districts = districts.clone();
        use_effect_with_deps(
            move |city: &String| {
                let city = city.clone();
                if city.is_empty() {
                    districts.set(Vec::new());
                } else {
                    spawn_local(async move {
                        match api::fetch_districts(&city).await {
                            Ok(list) => districts.set(list),
                            Err(err) => log::warn!("could not load districts for {}: {}", city, err),
                        }
                    });
                }
                || ()
            },
            form.city.clone(),
        );
    }

    let input = |field: Field| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let el: HtmlInputElement = e.target_unchecked_into();
            form.dispatch(FormAction::Set(field, el.value()));
        })
    };
    let select = |field: Field| {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let el: HtmlSelectElement = e.target_unchecked_into();
            form.dispatch(FormAction::Set(field, el.value()));
        })
    };
    let on_club_funded = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let el: HtmlInputElement = e.target_unchecked_into();
            form.dispatch(FormAction::SetClubFunded(el.checked()));
        })
    };
    let on_photo = {
        let photo = photo.clone();
        Callback::from(move |file: Option<File>| photo.set(file))
    };

    let on_submit = {
        let form = form.clone();
        let photo = photo.clone();
        let saving = saving.clone();
        let student_id = props.student_id;
        let on_saved = props.on_saved.clone();
        Callback::from(move |_| {
            if let Err(err) = form.validate(student_id.is_none(), photo.is_some()) {
                return dialogs::alert(&err.to_string());
            }
            let data = match to_form_data(&form, (*photo).as_ref()) {
                Ok(data) => data,
                Err(err) => {
                    log::error!("could not build student form: {:?}", err);
                    return dialogs::alert("Could not prepare the form");
                }
            };

            saving.set(true);
            let saving = saving.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                let result = match student_id {
                    Some(id) => api::update_student(id, data).await,
                    None => api::add_student(data).await,
                };
                match result {
                    Ok(resp) => {
                        dialogs::alert(&resp.message_or("Student saved"));
                        on_saved.emit(());
                    }
                    Err(err) => dialogs::report("saving student", err),
                }
                saving.set(false);
            });
        })
    };

    let text_field = |label: &'static str, field: Field, value: &str, kind: &'static str| {
        html! {
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{ label }</label>
                <input type={kind} class={INPUT_CLASS} value={value.to_string()} oninput={input(field)} />
            </div>
        }
    };

    let title = if props.student_id.is_some() {
        "Edit student"
    } else {
        "Add student"
    };

    if !*loaded {
        return html! {
            <Modal title={title} on_close={props.on_close.clone()}>
                <p class="text-muted-foreground text-sm">{"Loading..."}</p>
            </Modal>
        };
    }

    html! {
        <Modal title={title} wide={true} on_close={props.on_close.clone()}>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                { text_field("Last name", Field::LastName, &form.last_name, "text") }
                { text_field("First name", Field::FirstName, &form.first_name, "text") }
                { text_field("Middle name", Field::MiddleName, &form.middle_name, "text") }
                { text_field("Student number", Field::StudentNumber, &form.student_number, "text") }
                { text_field("School number", Field::SchoolNumber, &form.school_number, "text") }
                { text_field("Birth year", Field::BirthYear, &form.birth_year, "number") }
                { text_field("Phone", Field::Phone, &form.phone, "tel") }
                { text_field("Parent phone", Field::ParentPhone, &form.parent_phone, "tel") }
                { text_field("Admission date", Field::AdmissionDate, &form.admission_date, "date") }
            </div>
            <div class="grid grid-cols-1 md:grid-cols-4 gap-3">
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"City"}</label>
                    <select class={INPUT_CLASS} onchange={select(Field::City)}>
                        <option value="" selected={form.city.is_empty()}>{"Choose a city"}</option>
                        { for cities.iter().map(|c| html! {
                            <option value={c.clone()} selected={form.city == *c}>{ c.clone() }</option>
                        }) }
                    </select>
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"District"}</label>
                    <select class={INPUT_CLASS} onchange={select(Field::District)} disabled={form.city.is_empty()}>
                        <option value="" selected={form.district.is_empty()}>{"Choose a district"}</option>
                        { for districts.iter().map(|d| html! {
                            <option value={d.clone()} selected={form.district == *d}>{ d.clone() }</option>
                        }) }
                    </select>
                </div>
                { text_field("Street", Field::Street, &form.street, "text") }
                { text_field("House", Field::HouseNumber, &form.house_number, "text") }
            </div>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Group"}</label>
                    <select class={INPUT_CLASS} onchange={select(Field::GroupId)}>
                        <option value="" selected={form.group_id.is_empty()}>{"No group"}</option>
                        { for props.groups.iter().map(|g| html! {
                            <option value={g.id.to_string()} selected={form.group_id == g.id.to_string()}>
                                { match &g.schedule_time {
                                    Some(time) => format!("{} ({})", g.name, time),
                                    None => g.name.clone(),
                                } }
                            </option>
                        }) }
                    </select>
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Tariff"}</label>
                    <select class={INPUT_CLASS} onchange={select(Field::TariffId)}>
                        <option value="" selected={form.tariff_id.is_empty()}>{"No tariff"}</option>
                        { for props.tariffs.iter().map(|t| html! {
                            <option value={t.id.to_string()} selected={form.tariff_id == t.id.to_string()}>
                                { format!("{} ({})", t.name, crate::format::Sum(t.price)) }
                            </option>
                        }) }
                    </select>
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Status"}</label>
                    <select class={INPUT_CLASS} onchange={select(Field::Status)}>
                        { for STATUSES.iter().map(|(value, label)| html! {
                            <option value={*value} selected={form.status == *value}>{ *label }</option>
                        }) }
                    </select>
                </div>
            </div>
            {
                if form.is_blacklisted() {
                    text_field("Blacklist reason", Field::BlacklistReason, &form.blacklist_reason, "text")
                } else {
                    html! {}
                }
            }
            <div class="grid grid-cols-1 md:grid-cols-4 gap-3">
                { text_field("Passport series", Field::PassportSeries, &form.passport_series, "text") }
                { text_field("Passport number", Field::PassportNumber, &form.passport_number, "text") }
                { text_field("Issue date", Field::PassportIssueDate, &form.passport_issue_date, "date") }
                { text_field("Expiry date", Field::PassportExpiryDate, &form.passport_expiry_date, "date") }
            </div>
            { text_field("Issued by", Field::PassportIssuedBy, &form.passport_issued_by, "text") }
            <label class="flex items-center gap-3">
                <input type="checkbox" checked={form.club_funded} onchange={on_club_funded} />
                <span class="text-sm text-foreground">{"Funded by the club"}</span>
            </label>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Photo"}</label>
                <PhotoUpload existing={(*existing_photo).clone().map(AttrValue::from)} on_change={on_photo} />
            </div>
            <div class="flex gap-3">
                <button class={PRIMARY_BUTTON} onclick={on_submit} disabled={*saving}>{ if *saving { "Saving..." } else { "Save student" } }</button>
                <button class={SECONDARY_BUTTON} onclick={{
                    let on_close = props.on_close.clone();
                    Callback::from(move |_| on_close.emit(()))
                }}>{"Cancel"}</button>
            </div>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry<'a>(entries: &'a [(&'static str, String)], name: &str) -> &'a str {
        entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
            .unwrap()
    }

    fn filled() -> StudentForm {
        StudentForm {
            last_name: "Ivanov".into(),
            first_name: "Ivan".into(),
            student_number: "A-17".into(),
            ..StudentForm::new("2024-09-01")
        }
    }

    #[test]
    fn new_form_defaults() {
        let form = StudentForm::new("2024-09-01");
        assert_eq!(form.status, "active");
        assert_eq!(form.admission_date, "2024-09-01");
        assert!(!form.club_funded);
    }

    #[test]
    fn detail_loads_into_name_parts() {
        let detail = StudentDetail {
            id: 3,
            full_name: Some("Karimov Aziz Bekovich".into()),
            group_id: Some(4),
            admission_date: Some("2023-02-10".into()),
            passport_issue_date: Some("2020-05-01T00:00:00".into()),
            birth_year: Some(2012),
            club_funded: Some(true),
            ..StudentDetail::default()
        };
        let form = StudentForm::from_detail(&detail);
        assert_eq!(form.last_name, "Karimov");
        assert_eq!(form.first_name, "Aziz");
        assert_eq!(form.middle_name, "Bekovich");
        assert_eq!(form.group_id, "4");
        assert_eq!(form.tariff_id, "");
        assert_eq!(form.passport_issue_date, "2020-05-01");
        assert_eq!(form.birth_year, "2012");
        assert_eq!(form.status, "active");
        assert!(form.club_funded);
    }

    #[test]
    fn multipart_fields() {
        let mut form = filled();
        form.blacklist_reason = "late payments".into();
        let entries = form.entries();
        assert_eq!(entry(&entries, "full_name"), "Ivanov Ivan");
        assert_eq!(entry(&entries, "club_funded"), "false");
        assert_eq!(entry(&entries, "blacklist_reason"), "");

        form.status = "blacklist".into();
        form.club_funded = true;
        let entries = form.entries();
        assert_eq!(entry(&entries, "blacklist_reason"), "late payments");
        assert_eq!(entry(&entries, "club_funded"), "true");
    }

    #[test]
    fn photo_required_only_on_create() {
        let form = filled();
        assert_eq!(
            form.validate(true, false),
            Err(ValidationError::Rule("Please add a student photo"))
        );
        assert_eq!(form.validate(true, true), Ok(()));
        assert_eq!(form.validate(false, false), Ok(()));
    }

    #[test]
    fn names_and_number_are_required() {
        let form = StudentForm {
            first_name: String::new(),
            ..filled()
        };
        assert_eq!(form.validate(false, true), Err(ValidationError::MissingFields));

        let form = StudentForm {
            birth_year: "twenty".into(),
            ..filled()
        };
        assert!(form.validate(false, true).is_err());
    }

    #[test]
    fn changing_city_clears_district() {
        let form = Rc::new(StudentForm {
            city: "Tashkent".into(),
            district: "Chilanzar".into(),
            ..filled()
        });
        let same = form
            .clone()
            .reduce(FormAction::Set(Field::City, "Tashkent".into()));
        assert_eq!(same.district, "Chilanzar");

        let moved = form.reduce(FormAction::Set(Field::City, "Samarkand".into()));
        assert_eq!(moved.city, "Samarkand");
        assert_eq!(moved.district, "");
    }
}

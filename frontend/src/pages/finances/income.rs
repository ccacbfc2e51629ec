use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{Dataset, AFTER_PAYMENT_CHANGE};
use crate::api;
use crate::components::{
    bind_input, bind_select, bind_textarea, empty_row, icon_filter, icon_plus, panel, photo_url,
    Modal, StatCard, StatIcon, DANGER_BUTTON, INPUT_CLASS, LABEL_CLASS, LINK_BUTTON,
    PRIMARY_BUTTON, SECONDARY_BUTTON,
};
use crate::config::{api_base_url, BrowserStorage};
use crate::dates::{format_date, input_value, parse_input_date, parse_row_date, today, YearMonth};
use crate::dialogs;
use crate::error::ValidationError;
use crate::filters::{optional_id, DateRange, IncomeFilter};
use crate::format::Sum;
use crate::models::{
    Group, IncomePayment, IncomeSummary, MonthlyPaymentRequest, MonthlyPayments, PaymentUpdate,
    StudentDetail, StudentSummary,
};
use crate::payments::{
    payment_date_bounds, selectable_months, validate_amount, validate_payment_date,
    AvailabilityRule, MonthOption,
};

fn active_students_of(students: &[StudentSummary], group_id: Option<i64>) -> Vec<StudentSummary> {
    match group_id {
        Some(group) => students
            .iter()
            .filter(|s| s.is_active() && s.group_id == Some(group))
            .cloned()
            .collect(),
        None => Vec::new(),
    }
}

#[derive(Properties, PartialEq)]
pub struct IncomeTabProps {
    pub summary: Option<IncomeSummary>,
    pub groups: Vec<Group>,
    pub students: Vec<StudentSummary>,
    pub on_changed: Callback<&'static [Dataset]>,
}

#[derive(Clone, PartialEq)]
enum IncomeModal {
    Closed,
    Add,
    Edit(IncomePayment),
}

#[function_component(IncomeTab)]
pub fn income_tab(props: &IncomeTabProps) -> Html {
    let show_filters = use_state(|| false);
    let date_from = use_state(String::new);
    let date_to = use_state(String::new);
    let group = use_state(String::new);
    let student = use_state(String::new);
    let modal = use_state(|| IncomeModal::Closed);

    let filter = IncomeFilter {
        range: DateRange::from_inputs(&date_from, &date_to),
        group_id: optional_id(&group),
        student: (*student).clone(),
    };
    let group_students = active_students_of(&props.students, filter.group_id);

    let on_group_change = {
        let group = group.clone();
        let student = student.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            group.set(select.value());
            student.set(String::new());
        })
    };

    let on_reset = {
        let date_from = date_from.clone();
        let date_to = date_to.clone();
        let group = group.clone();
        let student = student.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |_| {
            date_from.set(String::new());
            date_to.set(String::new());
            group.set(String::new());
            student.set(String::new());
            on_changed.emit(&[Dataset::Income]);
        })
    };

    let toggle_filters = {
        let show_filters = show_filters.clone();
        Callback::from(move |_| show_filters.set(!*show_filters))
    };

    let open_add = {
        let modal = modal.clone();
        Callback::from(move |_| modal.set(IncomeModal::Add))
    };
    let close_modal = {
        let modal = modal.clone();
        Callback::from(move |_| modal.set(IncomeModal::Closed))
    };
    let on_saved = {
        let modal = modal.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |_| {
            modal.set(IncomeModal::Closed);
            on_changed.emit(AFTER_PAYMENT_CHANGE);
        })
    };

    let (today_total, month_total, total) = props
        .summary
        .as_ref()
        .map(|s| (s.today, s.month, s.total))
        .unwrap_or_default();

    let rows = props
        .summary
        .as_ref()
        .map(|s| filter.apply(&s.payments).into_iter().cloned().collect::<Vec<_>>())
        .unwrap_or_default();

    let row_html = |payment: &IncomePayment| {
        let on_edit = {
            let modal = modal.clone();
            let payment = payment.clone();
            Callback::from(move |_| modal.set(IncomeModal::Edit(payment.clone())))
        };
        let on_delete = {
            let on_changed = props.on_changed.clone();
            let id = payment.id;
            Callback::from(move |_| {
                let Some(id) = id else {
                    return;
                };
                if !dialogs::confirm("Delete this payment?") {
                    return;
                }
                let on_changed = on_changed.clone();
                spawn_local(async move {
                    match api::delete_payment(id).await {
                        Ok(_) => {
                            log::info!("payment {} deleted", id);
                            on_changed.emit(AFTER_PAYMENT_CHANGE);
                        }
                        Err(err) => dialogs::report("deleting payment", err),
                    }
                });
            })
        };

        html! {
            <tr class="text-sm hover:bg-muted/40 transition-colors">
                <td class="px-6 py-4 text-muted-foreground">{ format_date(&payment.payment_date) }</td>
                <td class="px-6 py-4 text-foreground">{ payment.student_name.clone() }</td>
                <td class="px-6 py-4">{ payment.group_name.clone().unwrap_or_else(|| "-".into()) }</td>
                <td class="px-6 py-4">{ payment.tariff_name.clone().unwrap_or_else(|| "-".into()) }</td>
                <td class="px-6 py-4 font-semibold">
                    { Sum(payment.amount_paid).to_string() }
                    {
                        if payment.amount_due > 0.0 {
                            html! { <span class="ml-2 bg-red-100 text-red-600 px-2 py-0.5 rounded-md text-[9px] font-bold">{ format!("Debt: {}", Sum(payment.amount_due)) }</span> }
                        } else {
                            html! {}
                        }
                    }
                </td>
                <td class="px-6 py-4">
                    {
                        if payment.is_full_payment {
                            html! { <span class="bg-green-100 text-green-700 px-2.5 py-1 rounded-md text-[9px] font-bold">{"Full"}</span> }
                        } else {
                            html! { <span class="bg-amber-100 text-amber-700 px-2.5 py-1 rounded-md text-[9px] font-bold">{"Partial"}</span> }
                        }
                    }
                </td>
                <td class="px-6 py-4 text-muted-foreground">{ payment.notes.clone().unwrap_or_default() }</td>
                <td class="px-6 py-4 text-right space-x-3">
                    {
                        if payment.id.is_some() {
                            html! {
                                <>
                                    <button class={LINK_BUTTON} onclick={on_edit}>{"Edit"}</button>
                                    <button class={DANGER_BUTTON} onclick={on_delete}>{"Delete"}</button>
                                </>
                            }
                        } else {
                            html! {}
                        }
                    }
                </td>
            </tr>
        }
    };

    let filter_panel = if *show_filters {
        html! {
            <div class="bg-white p-5 rounded-[10px] shadow-sm grid grid-cols-1 md:grid-cols-5 gap-3 items-end">
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"From"}</label>
                    <input type="date" class={INPUT_CLASS} value={(*date_from).clone()} oninput={bind_input(&date_from)} />
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"To"}</label>
                    <input type="date" class={INPUT_CLASS} value={(*date_to).clone()} oninput={bind_input(&date_to)} />
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Group"}</label>
                    <select class={INPUT_CLASS} onchange={on_group_change}>
                        <option value="" selected={group.is_empty()}>{"All groups"}</option>
                        { for props.groups.iter().map(|g| html! {
                            <option value={g.id.to_string()} selected={*group == g.id.to_string()}>{ g.name.clone() }</option>
                        }) }
                    </select>
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Student"}</label>
                    <input type="text" list="income-filter-students" class={INPUT_CLASS}
                        placeholder={if group.is_empty() { "Choose a group first" } else { "Student name" }}
                        disabled={group.is_empty()}
                        value={(*student).clone()} oninput={bind_input(&student)} />
                    <datalist id="income-filter-students">
                        { for group_students.iter().map(|s| html! { <option value={s.full_name.clone()} /> }) }
                    </datalist>
                </div>
                <button class={SECONDARY_BUTTON} onclick={on_reset}>{"Reset"}</button>
            </div>
        }
    } else {
        html! {}
    };

    let modal_html = match &*modal {
        IncomeModal::Closed => html! {},
        IncomeModal::Add => html! {
            <AddIncomeModal
                groups={props.groups.clone()}
                students={props.students.clone()}
                on_close={close_modal.clone()}
                on_saved={on_saved.clone()}
            />
        },
        IncomeModal::Edit(payment) => html! {
            <EditIncomeModal payment={payment.clone()} on_close={close_modal.clone()} on_saved={on_saved.clone()} />
        },
    };

    html! {
        <>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <StatCard title="Today" amount={today_total} icon={StatIcon::UpRight} />
                <StatCard title="This month" amount={month_total} icon={StatIcon::Wallet} />
                <StatCard title="Total" amount={total} icon={StatIcon::CreditCard} />
            </div>
            { filter_panel }
            { panel(
                "Income",
                html! {
                    <>
                        <button class={SECONDARY_BUTTON} onclick={toggle_filters}>{ icon_filter() }{ if *show_filters { "Hide filters" } else { "Filters" } }</button>
                        <button class={PRIMARY_BUTTON} onclick={open_add}>{ icon_plus() }{"Add income"}</button>
                    </>
                },
                html! {
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                    <th class="px-6 py-4 font-bold">{"Date"}</th>
                                    <th class="px-6 py-4 font-bold">{"Student"}</th>
                                    <th class="px-6 py-4 font-bold">{"Group"}</th>
                                    <th class="px-6 py-4 font-bold">{"Tariff"}</th>
                                    <th class="px-6 py-4 font-bold">{"Paid"}</th>
                                    <th class="px-6 py-4 font-bold">{"Status"}</th>
                                    <th class="px-6 py-4 font-bold">{"Notes"}</th>
                                    <th class="px-6 py-4 font-bold text-right">{"Actions"}</th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                {
                                    if props.summary.is_none() {
                                        empty_row(8, "Loading...")
                                    } else if rows.is_empty() {
                                        empty_row(8, "No payments found")
                                    } else {
                                        html! { <>{ for rows.iter().map(row_html) }</> }
                                    }
                                }
                            </tbody>
                        </table>
                    </div>
                }
            ) }
            { modal_html }
        </>
    }
}

#[derive(Properties, PartialEq)]
struct AddIncomeModalProps {
    groups: Vec<Group>,
    students: Vec<StudentSummary>,
    on_close: Callback<()>,
    on_saved: Callback<()>,
}

/// Student and tariff data loaded after a student is picked.
#[derive(Clone, PartialEq)]
struct PickedStudent {
    student_id: i64,
    detail: StudentDetail,
    payments: MonthlyPayments,
}

impl PickedStudent {
    fn belongs_to(&self, student_id: i64) -> bool {
        self.student_id == student_id
    }

    fn tariff_price(&self) -> f64 {
        if self.payments.tariff_price > 0.0 {
            self.payments.tariff_price
        } else {
            self.detail.tariff_price_or_default()
        }
    }

    fn months(&self, year: i32, current: YearMonth) -> Result<Vec<MonthOption>, ValidationError> {
        let rule = AvailabilityRule {
            admission: self
                .detail
                .admission_date
                .as_deref()
                .and_then(parse_row_date)
                .map(YearMonth::of),
            today: current,
            block_future: true,
        };
        selectable_months(year, &rule, &self.payments.payments_by_month, self.tariff_price())
    }
}

#[function_component(AddIncomeModal)]
fn add_income_modal(props: &AddIncomeModalProps) -> Html {
    let now = today();
    let year = YearMonth::of(now).year;
    let (min_date, max_date) = payment_date_bounds(now);

    let group = use_state(String::new);
    let student = use_state(String::new);
    let picked = use_state(|| None::<PickedStudent>);
    // Id of the most recently picked student; older responses are dropped.
    let latest_pick = use_mut_ref(|| None::<i64>);
    let month = use_state(String::new);
    let payment_date = use_state(move || input_value(now));
    let amount = use_state(String::new);
    let notes = use_state(String::new);
    let saving = use_state(|| false);

    let group_students = active_students_of(&props.students, optional_id(&group));
    let months = (*picked).as_ref().map(|p| p.months(year, YearMonth::of(now)));
    let selected = match (&months, month.trim().parse::<u32>().ok()) {
        (Some(Ok(options)), Some(m)) => options.iter().find(|o| o.month == m).cloned(),
        _ => None,
    };

    let on_group_change = {
        let group = group.clone();
        let student = student.clone();
        let picked = picked.clone();
        let latest_pick = latest_pick.clone();
        let month = month.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            group.set(select.value());
            student.set(String::new());
            *latest_pick.borrow_mut() = None;
            picked.set(None);
            month.set(String::new());
        })
    };

    let on_student_change = {
        let student = student.clone();
        let picked = picked.clone();
        let latest_pick = latest_pick.clone();
        let month = month.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            student.set(value.clone());
            picked.set(None);
            month.set(String::new());

            let id = optional_id(&value);
            *latest_pick.borrow_mut() = id;
            let Some(id) = id else {
                return;
            };
            let picked = picked.clone();
            let latest_pick = latest_pick.clone();
            spawn_local(async move {
                let detail = match api::fetch_student(id).await {
                    Ok(detail) => detail,
                    Err(err) => return dialogs::report("loading student", err),
                };
                let payments = match api::fetch_monthly_payments(id).await {
                    Ok(payments) => payments,
                    Err(err) => return dialogs::report("loading monthly payments", err),
                };
                if *latest_pick.borrow() != Some(id) {
                    log::debug!("dropping stale data for student {}", id);
                    return;
                }
                picked.set(Some(PickedStudent {
                    student_id: id,
                    detail,
                    payments,
                }));
            });
        })
    };

    let on_submit = {
        let student = student.clone();
        let picked = picked.clone();
        let selected = selected.clone();
        let payment_date = payment_date.clone();
        let amount = amount.clone();
        let notes = notes.clone();
        let saving = saving.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |_| {
            let request = (|| {
                let student_id = optional_id(&student).ok_or(ValidationError::MissingFields)?;
                let picked = (*picked)
                    .as_ref()
                    .filter(|p| p.belongs_to(student_id))
                    .ok_or(ValidationError::MissingFields)?;
                let option = selected.as_ref().ok_or(ValidationError::NoMonthSelected)?;
                let date =
                    parse_input_date(&payment_date).ok_or(ValidationError::MissingFields)?;
                validate_payment_date(date, today())?;
                let amount =
                    validate_amount(&amount, picked.tariff_price(), Some(option.remainder))?;
                Ok::<_, ValidationError>(MonthlyPaymentRequest {
                    student_id,
                    month: option.month,
                    year,
                    payment_date: input_value(date),
                    amount,
                    notes: notes.trim().to_string(),
                })
            })();

            let request = match request {
                Ok(request) => request,
                Err(err) => return dialogs::alert(&err.to_string()),
            };

            saving.set(true);
            let saving = saving.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                match api::add_monthly_payment(&request).await {
                    Ok(resp) => {
                        dialogs::alert(&resp.message_or("Payment recorded"));
                        on_saved.emit(());
                    }
                    Err(err) => dialogs::report("recording payment", err),
                }
                saving.set(false);
            });
        })
    };

    let photo = (*picked)
        .as_ref()
        .and_then(|p| p.detail.photo_path.clone())
        .filter(|path| !path.is_empty())
        .map(|path| photo_url(&api_base_url(&BrowserStorage), &path));

    let month_field = match &months {
        None => html! {
            <select class={INPUT_CLASS} disabled={true}><option>{"Choose a student first"}</option></select>
        },
        Some(Err(err)) => html! { <p class="text-sm text-red-500">{ err.to_string() }</p> },
        Some(Ok(options)) => html! {
            <select class={INPUT_CLASS} onchange={bind_select(&month)}>
                <option value="" selected={month.is_empty()}>{"Choose a month"}</option>
                { for options.iter().map(|o| html! {
                    <option value={o.month.to_string()} selected={*month == o.month.to_string()}>{ o.name() }</option>
                }) }
            </select>
        },
    };

    let debt_info = match (&selected, (*picked).as_ref()) {
        (Some(option), Some(p)) => html! {
            <p class="text-sm font-bold text-red-600">
                { format!("Debt: {} (Paid: {} / Tariff: {})", Sum(option.remainder), Sum(option.paid), Sum(p.tariff_price())) }
            </p>
        },
        _ => html! {},
    };

    html! {
        <Modal title="Add income" on_close={props.on_close.clone()}>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Group"}</label>
                <select class={INPUT_CLASS} onchange={on_group_change}>
                    <option value="" selected={group.is_empty()}>{"Choose a group"}</option>
                    { for props.groups.iter().map(|g| html! {
                        <option value={g.id.to_string()} selected={*group == g.id.to_string()}>{ g.name.clone() }</option>
                    }) }
                </select>
            </div>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Student"}</label>
                <select class={INPUT_CLASS} onchange={on_student_change} disabled={group.is_empty()}>
                    <option value="" selected={student.is_empty()}>{"Choose a student"}</option>
                    { for group_students.iter().map(|s| html! {
                        <option value={s.id.to_string()} selected={*student == s.id.to_string()}>{ s.full_name.clone() }</option>
                    }) }
                </select>
            </div>
            {
                match photo {
                    Some(src) => html! { <img src={src} alt="Student" class="w-20 h-20 rounded-[10px] object-cover" /> },
                    None => html! {},
                }
            }
            <div class="grid grid-cols-2 gap-3">
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Year"}</label>
                    <select class={INPUT_CLASS}><option value={year.to_string()}>{ year.to_string() }</option></select>
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Month"}</label>
                    { month_field }
                </div>
            </div>
            { debt_info }
            <div class="grid grid-cols-2 gap-3">
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Payment date"}</label>
                    <input type="date" class={INPUT_CLASS} min={input_value(min_date)} max={input_value(max_date)}
                        value={(*payment_date).clone()} oninput={bind_input(&payment_date)} />
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Amount"}</label>
                    <input type="number" min="1" class={INPUT_CLASS}
                        max={selected.as_ref().map(|o| o.remainder.to_string())}
                        value={(*amount).clone()} oninput={bind_input(&amount)} />
                </div>
            </div>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Notes"}</label>
                <textarea class={INPUT_CLASS} value={(*notes).clone()} oninput={bind_textarea(&notes)} />
            </div>
            <div class="flex gap-3">
                <button class={PRIMARY_BUTTON} onclick={on_submit} disabled={*saving}>{ if *saving { "Saving..." } else { "Save payment" } }</button>
                <button class={SECONDARY_BUTTON} onclick={{
                    let on_close = props.on_close.clone();
                    Callback::from(move |_| on_close.emit(()))
                }}>{"Cancel"}</button>
            </div>
        </Modal>
    }
}

#[derive(Properties, PartialEq)]
struct EditIncomeModalProps {
    payment: IncomePayment,
    on_close: Callback<()>,
    on_saved: Callback<()>,
}

#[function_component(EditIncomeModal)]
fn edit_income_modal(props: &EditIncomeModalProps) -> Html {
    let amount = {
        let initial = props.payment.amount_paid;
        use_state(move || initial.to_string())
    };
    let notes = {
        let initial = props.payment.notes.clone().unwrap_or_default();
        use_state(move || initial)
    };
    let saving = use_state(|| false);

    let on_submit = {
        let payment = props.payment.clone();
        let amount = amount.clone();
        let notes = notes.clone();
        let saving = saving.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |_| {
            let (Some(id), Some(student_id)) = (payment.id, payment.student_id) else {
                return dialogs::alert("This payment cannot be edited");
            };
            let amount = match validate_amount(&amount, 0.0, None) {
                Ok(amount) => amount,
                Err(err) => return dialogs::alert(&err.to_string()),
            };
            let update = PaymentUpdate::Income {
                student_id,
                amount,
                notes: notes.trim().to_string(),
            };

            saving.set(true);
            let saving = saving.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                match api::update_payment(id, &update).await {
                    Ok(_) => on_saved.emit(()),
                    Err(err) => dialogs::report("updating payment", err),
                }
                saving.set(false);
            });
        })
    };

    html! {
        <Modal title="Edit payment" on_close={props.on_close.clone()}>
            <p class="text-sm text-muted-foreground">
                { format!("{} · {}", props.payment.student_name, format_date(&props.payment.payment_date)) }
            </p>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Amount"}</label>
                <input type="number" min="1" class={INPUT_CLASS} value={(*amount).clone()} oninput={bind_input(&amount)} />
            </div>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Notes"}</label>
                <textarea class={INPUT_CLASS} value={(*notes).clone()} oninput={bind_textarea(&notes)} />
            </div>
            <button class={PRIMARY_BUTTON} onclick={on_submit} disabled={*saving}>{ if *saving { "Saving..." } else { "Save" } }</button>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64, group: Option<i64>, status: &str) -> StudentSummary {
        StudentSummary {
            id,
            full_name: format!("Student {}", id),
            student_number: None,
            group_id: group,
            group_name: None,
            tariff_name: None,
            status: status.into(),
            photo_path: None,
            admission_date: None,
        }
    }

    #[test]
    fn only_active_students_of_the_group_are_offered() {
        let roster = vec![
            student(1, Some(1), "active"),
            student(2, Some(1), "inactive"),
            student(3, Some(2), "active"),
        ];
        let ids: Vec<i64> = active_students_of(&roster, Some(1)).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1]);
        assert!(active_students_of(&roster, None).is_empty());
    }

    fn picked(id: i64, tariff_price: f64) -> PickedStudent {
        PickedStudent {
            student_id: id,
            detail: StudentDetail::default(),
            payments: MonthlyPayments {
                payments_by_month: Default::default(),
                tariff_price,
            },
        }
    }

    #[test]
    fn picked_data_is_tied_to_its_student() {
        let loaded = picked(7, 300_000.0);
        assert!(loaded.belongs_to(7));
        assert!(!loaded.belongs_to(8));
        assert_eq!(loaded.tariff_price(), 300_000.0);
    }
}

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::{
    bind_input, bind_textarea, icon_chevron_left, icon_chevron_right, Modal, DANGER_BUTTON,
    INPUT_CLASS, LABEL_CLASS, LINK_BUTTON, PRIMARY_BUTTON, SECONDARY_BUTTON,
};
use crate::dates::{
    format_date, input_value, month_name, parse_input_date, parse_row_date, today, YearMonth,
};
use crate::dialogs;
use crate::error::{ApiError, ValidationError};
use crate::format::Sum;
use crate::models::{MonthPayment, PaymentUpdate, StudentSummary};
use crate::payments::{
    payment_date_bounds, validate_amount, validate_payment_date, AvailabilityRule, MonthCell,
    MonthState, PaymentView,
};

async fn load_view(student_id: i64, block_future: bool) -> Result<PaymentView, ApiError> {
    let detail = api::fetch_student(student_id).await?;
    let monthly = api::fetch_monthly_payments(student_id).await?;
    let tariff_price = if monthly.tariff_price > 0.0 {
        monthly.tariff_price
    } else {
        detail.tariff_price_or_default()
    };
    let rule = AvailabilityRule {
        admission: detail
            .admission_date
            .as_deref()
            .and_then(parse_row_date)
            .map(YearMonth::of),
        today: YearMonth::of(today()),
        block_future,
    };
    Ok(PaymentView::new(
        student_id,
        tariff_price,
        rule,
        monthly.payments_by_month,
    ))
}

fn cell_class(state: MonthState, selected: bool) -> &'static str {
    match (state, selected) {
        (_, true) => "p-3 rounded-[10px] text-left border-2 border-[#173E63] bg-[#B2CBDE]",
        (MonthState::Open, false) => {
            "p-3 rounded-[10px] text-left border border-border bg-white hover:bg-[#eef4f9]"
        }
        (MonthState::Paid, false) => {
            "p-3 rounded-[10px] text-left border border-green-200 bg-green-50 cursor-default"
        }
        (MonthState::Disabled, false) => {
            "p-3 rounded-[10px] text-left border border-border bg-slate-100 opacity-50 cursor-not-allowed"
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct PaymentModalProps {
    pub student: StudentSummary,
    pub block_future: bool,
    pub on_close: Callback<()>,
}

/// Twelve-month tariff grid for one student with the payment form and the
/// payment history of the viewed year.
#[function_component(PaymentModal)]
pub fn payment_modal(props: &PaymentModalProps) -> Html {
    let view = use_state(|| None::<PaymentView>);
    let payment_date = use_state(|| input_value(today()));
    let amount = use_state(String::new);
    let notes = use_state(String::new);
    let saving = use_state(|| false);
    let editing = use_state(|| None::<(u32, MonthPayment)>);

    {
        let view = view.clone();
        let student_id = props.student.id;
        let block_future = props.block_future;
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match load_view(student_id, block_future).await {
                        Ok(loaded) => view.set(Some(loaded)),
                        Err(err) => dialogs::report("loading monthly payments", err),
                    }
                });
                || ()
            },
            (props.student.id, props.block_future),
        );
    }

    let shift_year = |delta: i32| {
        let view = view.clone();
        let amount = amount.clone();
        Callback::from(move |_| {
            if let Some(mut next) = (*view).clone() {
                next.shift_year(delta);
                view.set(Some(next));
                amount.set(String::new());
            }
        })
    };

    let on_submit = {
        let view = view.clone();
        let payment_date = payment_date.clone();
        let amount = amount.clone();
        let notes = notes.clone();
        let saving = saving.clone();
        Callback::from(move |_| {
            let Some(current) = (*view).as_ref() else {
                return;
            };
            let request = parse_input_date(&payment_date)
                .ok_or(ValidationError::MissingFields)
                .and_then(|date| validate_payment_date(date, today()))
                .and_then(|_| current.request(&amount, &payment_date, &notes));
            let request = match request {
                Ok(request) => request,
                Err(err) => return dialogs::alert(&err.to_string()),
            };

            saving.set(true);
            let saving = saving.clone();
            spawn_local(async move {
                match api::add_monthly_payment(&request).await {
                    Ok(resp) => {
                        dialogs::alert(&resp.message_or("Payment recorded"));
                        dialogs::reload_page();
                    }
                    Err(err) => {
                        dialogs::report("recording payment", err);
                        saving.set(false);
                    }
                }
            });
        })
    };

    let on_cancel = {
        let view = view.clone();
        let amount = amount.clone();
        Callback::from(move |_| {
            if let Some(mut next) = (*view).clone() {
                next.clear_selection();
                view.set(Some(next));
                amount.set(String::new());
            }
        })
    };

    let Some(current) = (*view).clone() else {
        return html! {
            <Modal title={format!("Payments: {}", props.student.full_name)} wide={true} on_close={props.on_close.clone()}>
                <p class="text-muted-foreground text-sm">{"Loading..."}</p>
            </Modal>
        };
    };

    let cells = current.cells();
    let selected_month = current.selected.as_ref().map(|s| s.month);
    let (min_date, max_date) = payment_date_bounds(today());

    let cell_html = |cell: &MonthCell| {
        let is_selected = selected_month == Some(cell.month);
        let onclick = {
            let view = view.clone();
            let amount = amount.clone();
            let month = cell.month.month;
            Callback::from(move |_| {
                if let Some(mut next) = (*view).clone() {
                    if next.select(month) {
                        view.set(Some(next));
                        amount.set(String::new());
                    }
                }
            })
        };
        let caption = match cell.state {
            MonthState::Paid => "Paid".to_string(),
            MonthState::Disabled => "Unavailable".to_string(),
            MonthState::Open if cell.total_paid > 0.0 => format!("Left: {}", Sum(cell.remainder)),
            MonthState::Open => "Not paid".to_string(),
        };
        html! {
            <button type="button" class={cell_class(cell.state, is_selected)}
                disabled={cell.state != MonthState::Open} onclick={onclick}>
                <p class="text-[12px] font-bold text-[#173E63]">{ cell.name() }</p>
                <p class="text-[10px] text-muted-foreground">{ caption }</p>
                {
                    if cell.total_paid > 0.0 {
                        html! { <p class="text-[10px] text-green-700">{ Sum(cell.total_paid).to_string() }</p> }
                    } else {
                        html! {}
                    }
                }
            </button>
        }
    };

    let history = cells
        .iter()
        .flat_map(|cell| cell.payments.iter().map(move |p| (cell.month.month, p.clone())))
        .collect::<Vec<_>>();

    let history_row = |(month, payment): &(u32, MonthPayment)| {
        let on_edit = {
            let editing = editing.clone();
            let entry = (*month, payment.clone());
            Callback::from(move |_| editing.set(Some(entry.clone())))
        };
        let on_delete = {
            let id = payment.id;
            Callback::from(move |_| {
                let Some(id) = id else {
                    return;
                };
                if !dialogs::confirm("Delete this payment?") {
                    return;
                }
                spawn_local(async move {
                    match api::delete_payment(id).await {
                        Ok(_) => dialogs::reload_page(),
                        Err(err) => dialogs::report("deleting payment", err),
                    }
                });
            })
        };
        html! {
            <tr class="text-sm">
                <td class="px-4 py-2">{ month_name(*month) }</td>
                <td class="px-4 py-2 text-muted-foreground">{ payment.date.as_deref().map(format_date).unwrap_or_else(|| "-".into()) }</td>
                <td class="px-4 py-2 font-semibold">{ Sum(payment.amount).to_string() }</td>
                <td class="px-4 py-2 text-muted-foreground">{ payment.notes.clone().unwrap_or_default() }</td>
                <td class="px-4 py-2 text-right space-x-3">
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

    let form = match &current.selected {
        None => html! { <p class="text-sm text-muted-foreground">{"Choose a month to record a payment"}</p> },
        Some(selected) => html! {
            <div class="bg-[#f8fafc] rounded-[10px] p-4 space-y-3">
                <p class="text-sm font-bold text-[#173E63]">
                    { format!("{} {}: remaining {}", selected.month.name(), selected.month.year, Sum(selected.remainder)) }
                </p>
                {
                    if selected.payments.is_empty() {
                        html! {}
                    } else {
                        let month = selected.month.month;
                        html! {
                            <div class="max-h-40 overflow-y-auto bg-white rounded-[10px]">
                                <table class="w-full text-left border-collapse">
                                    <tbody class="divide-y divide-border">
                                        { for selected.payments.iter().map(|p| history_row(&(month, p.clone()))) }
                                    </tbody>
                                </table>
                            </div>
                        }
                    }
                }
                <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                    <div class="space-y-1">
                        <label class={LABEL_CLASS}>{"Payment date"}</label>
                        <input type="date" class={INPUT_CLASS} min={input_value(min_date)} max={input_value(max_date)}
                            value={(*payment_date).clone()} oninput={bind_input(&payment_date)} />
                    </div>
                    <div class="space-y-1">
                        <label class={LABEL_CLASS}>{"Amount"}</label>
                        <input type="number" min="1" class={INPUT_CLASS} placeholder={current.amount_placeholder()}
                            value={(*amount).clone()} oninput={bind_input(&amount)} />
                    </div>
                    <div class="space-y-1">
                        <label class={LABEL_CLASS}>{"Notes"}</label>
                        <input type="text" class={INPUT_CLASS} value={(*notes).clone()} oninput={bind_input(&notes)} />
                    </div>
                </div>
                <div class="flex gap-3">
                    <button class={PRIMARY_BUTTON} onclick={on_submit} disabled={*saving}>{ if *saving { "Saving..." } else { "Record payment" } }</button>
                    <button class={SECONDARY_BUTTON} onclick={on_cancel}>{"Cancel"}</button>
                </div>
            </div>
        },
    };

    let edit_modal = match &*editing {
        Some((month, payment)) => {
            let on_close = {
                let editing = editing.clone();
                Callback::from(move |_| editing.set(None))
            };
            html! { <EditPaymentModal month={*month} payment={payment.clone()} on_close={on_close} /> }
        }
        None => html! {},
    };

    html! {
        <>
            <Modal title={format!("Payments: {}", props.student.full_name)} wide={true} on_close={props.on_close.clone()}>
                <div class="flex items-center justify-between">
                    <button type="button" class="p-2 rounded-full hover:bg-[#eef4f9]" onclick={shift_year(-1)}>{ icon_chevron_left() }</button>
                    <div class="text-center">
                        <p class="text-lg font-black text-[#173E63]">{ current.year.to_string() }</p>
                        <p class="text-[11px] text-muted-foreground">{ format!("Tariff: {}", Sum(current.tariff_price)) }</p>
                    </div>
                    <button type="button" class="p-2 rounded-full hover:bg-[#eef4f9]" onclick={shift_year(1)}>{ icon_chevron_right() }</button>
                </div>
                <div class="grid grid-cols-3 md:grid-cols-4 gap-2">
                    { for cells.iter().map(cell_html) }
                </div>
                { form }
                <div>
                    <h4 class="text-[#1D617A] font-bold text-[14px] mb-2">{"Payment history"}</h4>
                    {
                        if history.is_empty() {
                            html! { <p class="text-sm text-muted-foreground">{"No payments this year"}</p> }
                        } else {
                            html! {
                                <table class="w-full text-left border-collapse">
                                    <tbody class="divide-y divide-border">
                                        { for history.iter().map(|entry| history_row(entry)) }
                                    </tbody>
                                </table>
                            }
                        }
                    }
                </div>
            </Modal>
            { edit_modal }
        </>
    }
}

#[derive(Properties, PartialEq)]
struct EditPaymentModalProps {
    month: u32,
    payment: MonthPayment,
    on_close: Callback<()>,
}

#[function_component(EditPaymentModal)]
fn edit_payment_modal(props: &EditPaymentModalProps) -> Html {
    let amount = {
        let initial = props.payment.amount.to_string();
        use_state(move || initial)
    };
    let payment_date = {
        let initial = props
            .payment
            .date
            .as_deref()
            .and_then(parse_row_date)
            .map(input_value)
            .unwrap_or_default();
        use_state(move || initial)
    };
    let notes = {
        let initial = props.payment.notes.clone().unwrap_or_default();
        use_state(move || initial)
    };
    let saving = use_state(|| false);

    let on_submit = {
        let id = props.payment.id;
        let amount = amount.clone();
        let payment_date = payment_date.clone();
        let notes = notes.clone();
        let saving = saving.clone();
        Callback::from(move |_| {
            let Some(id) = id else {
                return;
            };
            let amount_paid = match validate_amount(&amount, 0.0, None) {
                Ok(amount) => amount,
                Err(err) => return dialogs::alert(&err.to_string()),
            };
            if parse_input_date(&payment_date).is_none() {
                return dialogs::alert(&ValidationError::MissingFields.to_string());
            }
            let update = PaymentUpdate::Correction {
                amount_paid,
                payment_date: (*payment_date).clone(),
                notes: notes.trim().to_string(),
            };

            saving.set(true);
            let saving = saving.clone();
            spawn_local(async move {
                match api::update_payment(id, &update).await {
                    Ok(_) => dialogs::reload_page(),
                    Err(err) => {
                        dialogs::report("updating payment", err);
                        saving.set(false);
                    }
                }
            });
        })
    };

    html! {
        <Modal title={format!("Edit payment: {}", month_name(props.month))} on_close={props.on_close.clone()}>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Amount"}</label>
                <input type="number" min="1" class={INPUT_CLASS} value={(*amount).clone()} oninput={bind_input(&amount)} />
            </div>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Payment date"}</label>
                <input type="date" class={INPUT_CLASS} value={(*payment_date).clone()} oninput={bind_input(&payment_date)} />
            </div>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Notes"}</label>
                <textarea class={INPUT_CLASS} value={(*notes).clone()} oninput={bind_textarea(&notes)} />
            </div>
            <button class={PRIMARY_BUTTON} onclick={on_submit} disabled={*saving}>{ if *saving { "Saving..." } else { "Save" } }</button>
        </Modal>
    }
}

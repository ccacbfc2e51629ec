use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{Dataset, AFTER_EXPENSE_CHANGE};
use crate::api;
use crate::components::{
    bind_input, bind_select, bind_textarea, empty_row, icon_filter, icon_plus, panel, Modal,
    StatCard, StatIcon, DANGER_BUTTON, INPUT_CLASS, LABEL_CLASS, LINK_BUTTON, PRIMARY_BUTTON,
    SECONDARY_BUTTON,
};
use crate::dates::{format_date, today};
use crate::dialogs;
use crate::error::ValidationError;
use crate::filters::{expense_categories, optional_text, DateRange, ExpenseFilter};
use crate::format::Sum;
use crate::models::{Expense, ExpenseDraft};
use crate::payments::validate_amount;
use crate::stats::expense_totals;

pub fn expense_draft(
    category: &str,
    amount: &str,
    description: &str,
) -> Result<ExpenseDraft, ValidationError> {
    let category = category.trim();
    if category.is_empty() || amount.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    Ok(ExpenseDraft {
        category: category.to_string(),
        amount: validate_amount(amount, 0.0, None)?,
        description: description.trim().to_string(),
    })
}

#[derive(Properties, PartialEq)]
pub struct ExpensesTabProps {
    pub expenses: Vec<Expense>,
    pub on_changed: Callback<&'static [Dataset]>,
}

#[derive(Clone, PartialEq)]
enum ExpenseModal {
    Closed,
    Add,
    Edit(Expense),
}

#[function_component(ExpensesTab)]
pub fn expenses_tab(props: &ExpensesTabProps) -> Html {
    let show_filters = use_state(|| false);
    let date_from = use_state(String::new);
    let date_to = use_state(String::new);
    let category = use_state(String::new);
    let modal = use_state(|| ExpenseModal::Closed);

    let filter = ExpenseFilter {
        range: DateRange::from_inputs(&date_from, &date_to),
        category: optional_text(&category),
    };
    let rows = filter.apply(&props.expenses);
    let totals = expense_totals(&rows, today());
    let categories = expense_categories(&props.expenses);

    let on_reset = {
        let date_from = date_from.clone();
        let date_to = date_to.clone();
        let category = category.clone();
        Callback::from(move |_| {
            date_from.set(String::new());
            date_to.set(String::new());
            category.set(String::new());
        })
    };
    let toggle_filters = {
        let show_filters = show_filters.clone();
        Callback::from(move |_| show_filters.set(!*show_filters))
    };
    let open_add = {
        let modal = modal.clone();
        Callback::from(move |_| modal.set(ExpenseModal::Add))
    };
    let close_modal = {
        let modal = modal.clone();
        Callback::from(move |_| modal.set(ExpenseModal::Closed))
    };
    let on_saved = {
        let modal = modal.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |_| {
            modal.set(ExpenseModal::Closed);
            on_changed.emit(AFTER_EXPENSE_CHANGE);
        })
    };

    let row_html = |expense: &Expense| {
        let on_edit = {
            let modal = modal.clone();
            let expense = expense.clone();
            Callback::from(move |_| modal.set(ExpenseModal::Edit(expense.clone())))
        };
        let on_delete = {
            let on_changed = props.on_changed.clone();
            let id = expense.id;
            Callback::from(move |_| {
                if !dialogs::confirm("Delete this expense?") {
                    return;
                }
                let on_changed = on_changed.clone();
                spawn_local(async move {
                    match api::delete_expense(id).await {
                        Ok(_) => on_changed.emit(AFTER_EXPENSE_CHANGE),
                        Err(err) => dialogs::report("deleting expense", err),
                    }
                });
            })
        };

        html! {
            <tr class="text-sm hover:bg-muted/40 transition-colors">
                <td class="px-6 py-4 text-muted-foreground">{ format_date(&expense.expense_date) }</td>
                <td class="px-6 py-4">
                    <span class="bg-secondary text-secondary-foreground px-2.5 py-1 rounded-md text-[9px] font-bold">{ expense.category.clone() }</span>
                </td>
                <td class="px-6 py-4 font-semibold text-red-600">{ format!("- {}", Sum(expense.amount)) }</td>
                <td class="px-6 py-4 text-muted-foreground">{ expense.description.clone().unwrap_or_default() }</td>
                <td class="px-6 py-4 text-right space-x-3">
                    <button class={LINK_BUTTON} onclick={on_edit}>{"Edit"}</button>
                    <button class={DANGER_BUTTON} onclick={on_delete}>{"Delete"}</button>
                </td>
            </tr>
        }
    };

    let filter_panel = if *show_filters {
        html! {
            <div class="bg-white p-5 rounded-[10px] shadow-sm grid grid-cols-1 md:grid-cols-4 gap-3 items-end">
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"From"}</label>
                    <input type="date" class={INPUT_CLASS} value={(*date_from).clone()} oninput={bind_input(&date_from)} />
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"To"}</label>
                    <input type="date" class={INPUT_CLASS} value={(*date_to).clone()} oninput={bind_input(&date_to)} />
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Category"}</label>
                    <select class={INPUT_CLASS} onchange={bind_select(&category)}>
                        <option value="" selected={category.is_empty()}>{"All categories"}</option>
                        { for categories.iter().map(|c| html! {
                            <option value={c.clone()} selected={*category == *c}>{ c.clone() }</option>
                        }) }
                    </select>
                </div>
                <button class={SECONDARY_BUTTON} onclick={on_reset}>{"Reset"}</button>
            </div>
        }
    } else {
        html! {}
    };

    let modal_html = match &*modal {
        ExpenseModal::Closed => html! {},
        ExpenseModal::Add => html! {
            <ExpenseFormModal categories={categories.clone()} on_close={close_modal.clone()} on_saved={on_saved.clone()} />
        },
        ExpenseModal::Edit(expense) => html! {
            <ExpenseFormModal existing={expense.clone()} categories={categories.clone()} on_close={close_modal.clone()} on_saved={on_saved.clone()} />
        },
    };

    html! {
        <>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <StatCard title="Today" amount={totals.today} icon={StatIcon::CreditCard} />
                <StatCard title="This month" amount={totals.month} icon={StatIcon::Wallet} />
                <StatCard title="Total" amount={totals.total} icon={StatIcon::UpRight} />
            </div>
            { filter_panel }
            { panel(
                "Expenses",
                html! {
                    <>
                        <button class={SECONDARY_BUTTON} onclick={toggle_filters}>{ icon_filter() }{ if *show_filters { "Hide filters" } else { "Filters" } }</button>
                        <button class={PRIMARY_BUTTON} onclick={open_add}>{ icon_plus() }{"Add expense"}</button>
                    </>
                },
                html! {
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                    <th class="px-6 py-4 font-bold">{"Date"}</th>
                                    <th class="px-6 py-4 font-bold">{"Category"}</th>
                                    <th class="px-6 py-4 font-bold">{"Amount"}</th>
                                    <th class="px-6 py-4 font-bold">{"Description"}</th>
                                    <th class="px-6 py-4 font-bold text-right">{"Actions"}</th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                {
                                    if rows.is_empty() {
                                        empty_row(5, "No expenses found")
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
struct ExpenseFormModalProps {
    #[prop_or_default]
    existing: Option<Expense>,
    categories: Vec<String>,
    on_close: Callback<()>,
    on_saved: Callback<()>,
}

#[function_component(ExpenseFormModal)]
fn expense_form_modal(props: &ExpenseFormModalProps) -> Html {
    let category = {
        let initial = props
            .existing
            .as_ref()
            .map(|e| e.category.clone())
            .unwrap_or_default();
        use_state(move || initial)
    };
    let amount = {
        let initial = props
            .existing
            .as_ref()
            .map(|e| e.amount.to_string())
            .unwrap_or_default();
        use_state(move || initial)
    };
    let description = {
        let initial = props
            .existing
            .as_ref()
            .and_then(|e| e.description.clone())
            .unwrap_or_default();
        use_state(move || initial)
    };
    let saving = use_state(|| false);

    let on_submit = {
        let existing_id = props.existing.as_ref().map(|e| e.id);
        let category = category.clone();
        let amount = amount.clone();
        let description = description.clone();
        let saving = saving.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |_| {
            let draft = match expense_draft(&category, &amount, &description) {
                Ok(draft) => draft,
                Err(err) => return dialogs::alert(&err.to_string()),
            };

            saving.set(true);
            let saving = saving.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                let result = match existing_id {
                    Some(id) => api::update_expense(id, &draft).await,
                    None => api::add_expense(&draft).await,
                };
                match result {
                    Ok(_) => {
                        log::info!("expense saved ({})", draft.category);
                        on_saved.emit(());
                    }
                    Err(err) => dialogs::report("saving expense", err),
                }
                saving.set(false);
            });
        })
    };

    let title = if props.existing.is_some() {
        "Edit expense"
    } else {
        "Add expense"
    };

    html! {
        <Modal title={title} on_close={props.on_close.clone()}>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Category"}</label>
                <input type="text" list="expense-categories" class={INPUT_CLASS} value={(*category).clone()} oninput={bind_input(&category)} />
                <datalist id="expense-categories">
                    { for props.categories.iter().map(|c| html! { <option value={c.clone()} /> }) }
                </datalist>
            </div>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Amount"}</label>
                <input type="number" min="1" class={INPUT_CLASS} value={(*amount).clone()} oninput={bind_input(&amount)} />
            </div>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Description"}</label>
                <textarea class={INPUT_CLASS} value={(*description).clone()} oninput={bind_textarea(&description)} />
            </div>
            <button class={PRIMARY_BUTTON} onclick={on_submit} disabled={*saving}>{ if *saving { "Saving..." } else { "Save" } }</button>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_requires_category_and_amount() {
        assert_eq!(
            expense_draft(" ", "100", ""),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            expense_draft("Rent", "", ""),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            expense_draft("Rent", "-4", ""),
            Err(ValidationError::InvalidAmount)
        );
    }

    #[test]
    fn draft_is_trimmed() {
        assert_eq!(
            expense_draft(" Rent ", "1500000", " March "),
            Ok(ExpenseDraft {
                category: "Rent".into(),
                amount: 1_500_000.0,
                description: "March".into(),
            })
        );
    }
}

mod expenses;
mod income;
mod reports;

use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::page_shell;
use crate::dialogs;
use crate::models::{AnalyticsMonth, DebtorsReport, Expense, Group, IncomeSummary, StudentSummary};

use expenses::ExpensesTab;
use income::IncomeTab;
use reports::{AnalyticsTab, DebtorsTab};

#[derive(Clone, Copy, PartialEq)]
enum FinanceTab {
    Income,
    Expenses,
    Debtors,
    Analytics,
}

impl FinanceTab {
    const ALL: [FinanceTab; 4] = [
        FinanceTab::Income,
        FinanceTab::Expenses,
        FinanceTab::Debtors,
        FinanceTab::Analytics,
    ];

    fn label(self) -> &'static str {
        match self {
            FinanceTab::Income => "Income",
            FinanceTab::Expenses => "Expenses",
            FinanceTab::Debtors => "Debtors",
            FinanceTab::Analytics => "Analytics",
        }
    }
}

/// Server datasets a change can invalidate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Dataset {
    Income,
    Expenses,
    Debtors,
    Analytics,
}

pub const AFTER_PAYMENT_CHANGE: &[Dataset] = &[Dataset::Income, Dataset::Debtors, Dataset::Analytics];
pub const AFTER_EXPENSE_CHANGE: &[Dataset] = &[Dataset::Expenses, Dataset::Analytics];

/// Per-dataset revision counters. Each fetch effect depends on its own field.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct DatasetRevisions {
    income: u32,
    expenses: u32,
    debtors: u32,
    analytics: u32,
}

impl Reducible for DatasetRevisions {
    type Action = &'static [Dataset];

    fn reduce(self: Rc<Self>, sets: Self::Action) -> Rc<Self> {
        let mut next = *self;
        for set in sets {
            let rev = match set {
                Dataset::Income => &mut next.income,
                Dataset::Expenses => &mut next.expenses,
                Dataset::Debtors => &mut next.debtors,
                Dataset::Analytics => &mut next.analytics,
            };
            *rev = rev.wrapping_add(1);
        }
        Rc::new(next)
    }
}

#[function_component(FinancesPage)]
pub fn finances_page() -> Html {
    let tab = use_state(|| FinanceTab::Income);

    let income = use_state(|| None::<IncomeSummary>);
    let expenses = use_state(Vec::<Expense>::new);
    let debtors = use_state(|| None::<DebtorsReport>);
    let analytics = use_state(Vec::<AnalyticsMonth>::new);
    let groups = use_state(Vec::<Group>::new);
    let students = use_state(Vec::<StudentSummary>::new);

    let revisions = use_reducer(DatasetRevisions::default);

    {
        let income = income.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_income().await {
                        Ok(summary) => {
                            log::debug!("loaded {} income rows", summary.payments.len());
                            income.set(Some(summary));
                        }
                        Err(err) => dialogs::report("loading income", err),
                    }
                });
                || ()
            },
            revisions.income,
        );
    }

    {
        let expenses = expenses.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_expenses().await {
                        Ok(summary) => expenses.set(summary.expenses),
                        Err(err) => dialogs::report("loading expenses", err),
                    }
                });
                || ()
            },
            revisions.expenses,
        );
    }

    {
        let debtors = debtors.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_debtors().await {
                        Ok(report) => debtors.set(Some(report)),
                        Err(err) => dialogs::report("loading debtors", err),
                    }
                });
                || ()
            },
            revisions.debtors,
        );
    }

    {
        let analytics = analytics.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_analytics().await {
                        Ok(report) => analytics.set(report.months),
                        Err(err) => dialogs::report("loading analytics", err),
                    }
                });
                || ()
            },
            revisions.analytics,
        );
    }

    {
        let groups = groups.clone();
        let students = students.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_groups().await {
                        Ok(list) => groups.set(list),
                        Err(err) => dialogs::report("loading groups", err),
                    }
                    match api::fetch_students().await {
                        Ok(list) => students.set(list),
                        Err(err) => dialogs::report("loading students", err),
                    }
                });
                || ()
            },
            (),
        );
    }

    let reload = {
        let revisions = revisions.dispatcher();
        Callback::from(move |sets: &'static [Dataset]| revisions.dispatch(sets))
    };

    let tabs = FinanceTab::ALL.iter().map(|t| {
        let t = *t;
        let class_name = if t == *tab {
            "px-4 py-2 rounded-[10px] text-[12px] font-bold bg-[#173E63] text-white"
        } else {
            "px-4 py-2 rounded-[10px] text-[12px] font-bold text-[#173E63] hover:bg-[#D8E1E8]"
        };
        let onclick = {
            let tab = tab.clone();
            Callback::from(move |_| tab.set(t))
        };
        html! { <button type="button" class={class_name} onclick={onclick}>{ t.label() }</button> }
    });

    let content = match *tab {
        FinanceTab::Income => html! {
            <IncomeTab
                summary={(*income).clone()}
                groups={(*groups).clone()}
                students={(*students).clone()}
                on_changed={reload.clone()}
            />
        },
        FinanceTab::Expenses => html! {
            <ExpensesTab expenses={(*expenses).clone()} on_changed={reload.clone()} />
        },
        FinanceTab::Debtors => html! { <DebtorsTab report={(*debtors).clone()} /> },
        FinanceTab::Analytics => html! { <AnalyticsTab months={(*analytics).clone()} /> },
    };

    html! {
        { page_shell(
            "Finances",
            html! {},
            html! {
                <>
                    <div class="flex gap-2 bg-white p-2 rounded-[12px] shadow-sm w-fit">{ for tabs }</div>
                    { content }
                </>
            }
        ) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump(start: DatasetRevisions, sets: &'static [Dataset]) -> DatasetRevisions {
        *Rc::new(start).reduce(sets)
    }

    #[test]
    fn payment_change_skips_expenses() {
        let next = bump(DatasetRevisions::default(), AFTER_PAYMENT_CHANGE);
        assert_eq!(
            next,
            DatasetRevisions {
                income: 1,
                expenses: 0,
                debtors: 1,
                analytics: 1,
            }
        );
    }

    #[test]
    fn consecutive_changes_accumulate() {
        let next = bump(DatasetRevisions::default(), AFTER_EXPENSE_CHANGE);
        let next = bump(next, AFTER_EXPENSE_CHANGE);
        let next = bump(next, AFTER_PAYMENT_CHANGE);
        assert_eq!(next.expenses, 2);
        assert_eq!(next.analytics, 3);
        assert_eq!(next.income, 1);
        assert_eq!(next.debtors, 1);
    }
}

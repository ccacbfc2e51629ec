use yew::prelude::*;

use crate::components::{empty_row, panel, StatCard, StatIcon};
use crate::format::{format_signed, Sum, CURRENCY_LABEL};
use crate::models::{AnalyticsMonth, DebtorsReport};
use crate::stats::{analytics_totals, chart_bars};

#[derive(Properties, PartialEq)]
pub struct DebtorsTabProps {
    pub report: Option<DebtorsReport>,
}

#[function_component(DebtorsTab)]
pub fn debtors_tab(props: &DebtorsTabProps) -> Html {
    let Some(report) = props.report.as_ref() else {
        return html! { <p class="text-muted-foreground">{"Loading..."}</p> };
    };

    html! {
        <>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <StatCard title="Total debt" amount={report.total_debt} icon={StatIcon::CreditCard} />
                <StatCard title="Debtors" value={report.count.to_string()} icon={StatIcon::Users} />
            </div>
            { panel(
                "Debtors",
                html! {},
                html! {
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                    <th class="px-6 py-4 font-bold">{"Student"}</th>
                                    <th class="px-6 py-4 font-bold">{"Phone"}</th>
                                    <th class="px-6 py-4 font-bold">{"Tariff"}</th>
                                    <th class="px-6 py-4 font-bold">{"Month"}</th>
                                    <th class="px-6 py-4 font-bold">{"Paid"}</th>
                                    <th class="px-6 py-4 font-bold text-right">{"Debt"}</th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                {
                                    if report.debtors.is_empty() {
                                        empty_row(6, "No debtors")
                                    } else {
                                        html! {
                                            <>
                                                { for report.debtors.iter().map(|d| html! {
                                                    <tr key={format!("{}-{}", d.student_id, d.month_label)} class="text-sm hover:bg-muted/40">
                                                        <td class="px-6 py-4 text-foreground">{ d.student_name.clone() }</td>
                                                        <td class="px-6 py-4 text-muted-foreground">{ d.student_phone.clone() }</td>
                                                        <td class="px-6 py-4">{ d.tariff_name.clone() }</td>
                                                        <td class="px-6 py-4">{ d.month_label.clone() }</td>
                                                        <td class="px-6 py-4">{ Sum(d.amount_paid).to_string() }</td>
                                                        <td class="px-6 py-4 text-right font-semibold text-red-600">{ Sum(d.amount_due).to_string() }</td>
                                                    </tr>
                                                }) }
                                            </>
                                        }
                                    }
                                }
                            </tbody>
                        </table>
                    </div>
                }
            ) }
        </>
    }
}

fn balance_class(value: f64) -> &'static str {
    if value >= 0.0 {
        "px-6 py-4 text-right font-semibold text-green-600"
    } else {
        "px-6 py-4 text-right font-semibold text-red-600"
    }
}

#[derive(Properties, PartialEq)]
pub struct AnalyticsTabProps {
    pub months: Vec<AnalyticsMonth>,
}

#[function_component(AnalyticsTab)]
pub fn analytics_tab(props: &AnalyticsTabProps) -> Html {
    let totals = analytics_totals(&props.months);
    let bars = chart_bars(&props.months);

    html! {
        <>
            { panel(
                "Income and expenses by month",
                html! {},
                html! {
                    <div class="p-6">
                        <div class="flex items-end gap-3 h-56">
                            { for bars.iter().map(|bar| html! {
                                <div class="flex-1 flex flex-col items-center gap-2 h-full">
                                    <div class="flex-1 w-full flex items-end justify-center gap-1">
                                        <div class="w-3 bg-[#1D617A] rounded-t" style={format!("height: {:.1}%", bar.income_pct)}
                                            title={format!("Income: {}", Sum(bar.income))}></div>
                                        <div class="w-3 bg-red-400 rounded-t" style={format!("height: {:.1}%", bar.expense_pct)}
                                            title={format!("Expense: {}", Sum(bar.expense))}></div>
                                    </div>
                                    <span class="text-[10px] text-muted-foreground">{ bar.label.clone() }</span>
                                </div>
                            }) }
                        </div>
                        <div class="flex gap-4 mt-4 text-[11px] text-muted-foreground">
                            <span class="flex items-center gap-1"><span class="w-3 h-3 bg-[#1D617A] rounded-sm"></span>{"Income"}</span>
                            <span class="flex items-center gap-1"><span class="w-3 h-3 bg-red-400 rounded-sm"></span>{"Expense"}</span>
                        </div>
                    </div>
                }
            ) }
            { panel(
                "Last 12 months",
                html! {},
                html! {
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                    <th class="px-6 py-4 font-bold">{"Month"}</th>
                                    <th class="px-6 py-4 font-bold text-right">{"Income"}</th>
                                    <th class="px-6 py-4 font-bold text-right">{"Expense"}</th>
                                    <th class="px-6 py-4 font-bold text-right">{"Balance"}</th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                {
                                    if props.months.is_empty() {
                                        empty_row(4, "No data")
                                    } else {
                                        html! {
                                            <>
                                                { for props.months.iter().map(|m| {
                                                    let balance = m.income - m.expense;
                                                    html! {
                                                        <tr class="text-sm">
                                                            <td class="px-6 py-4">{ m.month_name.clone() }</td>
                                                            <td class="px-6 py-4 text-right">{ Sum(m.income).to_string() }</td>
                                                            <td class="px-6 py-4 text-right">{ Sum(m.expense).to_string() }</td>
                                                            <td class={balance_class(balance)}>{ format!("{} {}", format_signed(balance), CURRENCY_LABEL) }</td>
                                                        </tr>
                                                    }
                                                }) }
                                                <tr class="text-sm font-bold bg-muted">
                                                    <td class="px-6 py-4">{"Total for 12 months"}</td>
                                                    <td class="px-6 py-4 text-right">{ Sum(totals.income).to_string() }</td>
                                                    <td class="px-6 py-4 text-right">{ Sum(totals.expense).to_string() }</td>
                                                    <td class={balance_class(totals.balance())}>{ format!("{} {}", format_signed(totals.balance()), CURRENCY_LABEL) }</td>
                                                </tr>
                                            </>
                                        }
                                    }
                                }
                            </tbody>
                        </table>
                    </div>
                }
            ) }
        </>
    }
}

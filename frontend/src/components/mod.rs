mod modal;
mod photo_upload;

pub use modal::Modal;
pub use photo_upload::{photo_url, upload_name, PhotoUpload};

use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::format::Sum;

pub const INPUT_CLASS: &str = "w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none focus:ring-2 focus:ring-[#1D617A] outline-none";
pub const LABEL_CLASS: &str = "text-[12px] font-bold text-muted-foreground";
pub const PRIMARY_BUTTON: &str = "bg-[#173E63] text-white px-4 py-2 rounded-[10px] text-[11px] font-bold flex items-center justify-center gap-2 disabled:opacity-50";
pub const SECONDARY_BUTTON: &str = "bg-[#B2CBDE] text-[#173E63] px-4 py-2 rounded-[10px] text-[11px] font-bold flex items-center justify-center gap-2";
pub const DANGER_BUTTON: &str = "text-red-500 hover:text-red-700 text-[11px] font-bold";
pub const LINK_BUTTON: &str = "text-[#1D617A] hover:text-[#173E63] text-[11px] font-bold";

pub fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub fn bind_select(state: &UseStateHandle<String>) -> Callback<Event> {
    let state = state.clone();
    Callback::from(move |e: Event| {
        let input: HtmlSelectElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub fn bind_textarea(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlTextAreaElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub fn bind_checkbox(state: &UseStateHandle<bool>) -> Callback<Event> {
    let state = state.clone();
    Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.checked());
    })
}

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-black text-[#173E63] tracking-tight">{ title }</h1>
                <div class="flex items-center gap-3">{ actions }</div>
            </div>
            { children }
        </div>
    }
}

/// Single-column card with a header row, used by tables and forms.
pub fn panel(title: &str, actions: Html, children: Html) -> Html {
    html! {
        <div class="bg-white rounded-[10px] shadow-sm border border-white/50 overflow-hidden">
            <div class="p-5 border-b border-border flex items-center justify-between">
                <h3 class="font-bold text-lg text-foreground">{ title.to_string() }</h3>
                <div class="flex items-center gap-2">{ actions }</div>
            </div>
            { children }
        </div>
    }
}

pub fn empty_row(colspan: usize, text: &str) -> Html {
    html! {
        <tr>
            <td colspan={colspan.to_string()} class="px-6 py-6 text-center text-muted-foreground">{ text.to_string() }</td>
        </tr>
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum StatIcon {
    UpRight,
    CreditCard,
    Wallet,
    Users,
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: &'static str,
    pub icon: StatIcon,
    #[prop_or_default]
    pub amount: Option<f64>,
    /// Plain value shown instead of an amount, e.g. a count.
    #[prop_or_default]
    pub value: Option<String>,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    let shown = match (&props.value, props.amount) {
        (Some(value), _) => value.clone(),
        (None, Some(amount)) => Sum(amount).to_string(),
        (None, None) => "-".to_string(),
    };

    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest">{ props.title }</p>
                <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">{ shown }</h3>
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::UpRight => icon_arrow_up_right(),
                        StatIcon::CreditCard => icon_credit_card(),
                        StatIcon::Wallet => icon_wallet(),
                        StatIcon::Users => icon_users(),
                    }
                }
            </div>
        </div>
    }
}

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="text-foreground">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_users() -> Html {
    icon_base("M17 21v-2a4 4 0 00-4-4H5a4 4 0 00-4 4v2M9 11a4 4 0 100-8 4 4 0 000 8zM23 21v-2a4 4 0 00-3-3.87M16 3.13a4 4 0 010 7.75")
}
pub fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
pub fn icon_credit_card() -> Html {
    icon_base("M3 7h18v10H3zM3 11h18")
}
pub fn icon_settings() -> Html {
    icon_base("M12 1v3M12 20v3M4.2 4.2l2.1 2.1M17.7 17.7l2.1 2.1M1 12h3M20 12h3M4.2 19.8l2.1-2.1M17.7 6.3l2.1-2.1")
}
pub fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}
pub fn icon_arrow_up_right() -> Html {
    icon_base("M7 17L17 7M7 7h10v10")
}
pub fn icon_filter() -> Html {
    icon_base("M22 3H2l8 9.46V19l4 2v-8.54L22 3z")
}
pub fn icon_chevron_left() -> Html {
    icon_base("M15 18l-6-6 6-6")
}
pub fn icon_chevron_right() -> Html {
    icon_base("M9 18l6-6-6-6")
}

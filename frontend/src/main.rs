mod api;
mod components;
mod config;
mod dates;
mod debounce;
mod dialogs;
mod error;
mod filters;
mod format;
mod logger;
mod models;
mod names;
mod pages;
mod payments;
mod stats;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use components::{icon_credit_card, icon_settings, icon_users};
use config::{load_sidebar_collapsed, save_sidebar_collapsed, BrowserStorage};
use models::ClubSettings;
use pages::{FinancesPage, SettingsPage, StudentsPage};

const DEFAULT_SYSTEM_NAME: &str = "Football School";

#[derive(Clone, Copy, PartialEq)]
enum Page {
    Students,
    Finances,
    Settings,
}

#[derive(Properties, PartialEq)]
struct LayoutProps {
    children: Children,
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(Layout)]
fn layout(props: &LayoutProps) -> Html {
    let collapsed = use_state(|| load_sidebar_collapsed(&BrowserStorage));
    let on_toggle = {
        let collapsed = collapsed.clone();
        Callback::from(move |_| {
            let next = !*collapsed;
            save_sidebar_collapsed(&BrowserStorage, next);
            collapsed.set(next);
        })
    };

    html! {
        <div class="flex h-screen bg-background">
            <Sidebar
                active_page={props.active_page}
                on_select={props.on_select.clone()}
                collapsed={*collapsed}
                on_toggle={on_toggle}
            />

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[function_component(Header)]
fn header() -> Html {
    let club = use_context::<UseStateHandle<ClubSettings>>();
    let title = club
        .map(|c| c.system_name.clone())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SYSTEM_NAME.to_string());

    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <h1 class="text-lg font-black text-[#173E63] tracking-tight">{ title }</h1>
            <span class="text-[11px] font-bold text-slate-500 uppercase tracking-widest">{"Admin"}</span>
        </header>
    }
}

struct NavItem {
    label: &'static str,
    page: Page,
    icon: fn() -> Html,
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_page: Page,
    on_select: Callback<Page>,
    collapsed: bool,
    on_toggle: Callback<MouseEvent>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let nav_items = vec![
        NavItem {
            label: "Students",
            page: Page::Students,
            icon: icon_users,
        },
        NavItem {
            label: "Finances",
            page: Page::Finances,
            icon: icon_credit_card,
        },
        NavItem {
            label: "Settings",
            page: Page::Settings,
            icon: icon_settings,
        },
    ];

    let width = if props.collapsed { "w-[76px]" } else { "w-[220px]" };

    html! {
        <div class={classes!(width, "h-screen", "bg-[#D8E1E8]", "p-4", "flex", "flex-col", "transition-all")}>
            <div class="flex items-center justify-between gap-3 px-2 mb-8">
                if !props.collapsed {
                    <span class="text-[#173E63] text-xl font-black tracking-tight truncate">{"Club"}</span>
                }
                <button
                    type="button"
                    class="w-10 h-10 rounded-full bg-[#173E63] text-white flex items-center justify-center shrink-0"
                    aria-label="Toggle sidebar"
                    onclick={props.on_toggle.clone()}
                >
                    { if props.collapsed { "☰" } else { "✕" } }
                </button>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for nav_items.iter().map(|item| {
                        let is_active = item.page == props.active_page;
                        let class_name = if is_active {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let page = item.page;

                        html! {
                            <button type="button" class={class_name} title={item.label} onclick={Callback::from(move |_| on_select.emit(page))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                if !props.collapsed {
                                    <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                                }
                            </button>
                        }
                    }) }
                </nav>
            </div>
        </div>
    }
}

#[function_component(App)]
fn app() -> Html {
    let active_page = use_state(|| Page::Students);
    let settings = use_state(ClubSettings::default);
    let on_select = {
        let active_page = active_page.clone();
        Callback::from(move |page: Page| active_page.set(page))
    };

    {
        let settings = settings.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_club_settings().await {
                        Ok(loaded) => {
                            log::info!("club settings loaded for {:?}", loaded.system_name);
                            settings.set(loaded);
                        }
                        Err(err) => log::error!("loading club settings: {}", err),
                    }
                });
                || ()
            },
            (),
        );
    }

    let content = match *active_page {
        Page::Students => html! { <StudentsPage /> },
        Page::Finances => html! { <FinancesPage /> },
        Page::Settings => html! { <SettingsPage /> },
    };

    html! {
        <ContextProvider<UseStateHandle<ClubSettings>> context={settings}>
            <Layout active_page={*active_page} on_select={on_select}>
                { content }
            </Layout>
        </ContextProvider<UseStateHandle<ClubSettings>>>
    }
}

fn main() {
    logger::init(log::LevelFilter::Debug);
    yew::Renderer::<App>::new().render();
}

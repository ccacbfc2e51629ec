use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::{
    bind_checkbox, bind_input, page_shell, INPUT_CLASS, LABEL_CLASS, PRIMARY_BUTTON,
};
use crate::dialogs;
use crate::error::ValidationError;
use crate::models::{ClubSettings, CredentialsUpdate};

pub const WEEKDAYS: [(u8, &str); 7] = [
    (1, "Mon"),
    (2, "Tue"),
    (3, "Wed"),
    (4, "Thu"),
    (5, "Fri"),
    (6, "Sat"),
    (7, "Sun"),
];

const PODIUM_MIN: u32 = 5;
const PODIUM_MAX: u32 = 50;
const PODIUM_STEP: u32 = 5;

/// Rounds a stored podium size to the nearest allowed step.
pub fn normalize_podium(value: u32) -> u32 {
    let rounded = ((value as f64) / PODIUM_STEP as f64).round() as u32 * PODIUM_STEP;
    rounded.clamp(PODIUM_MIN, PODIUM_MAX)
}

pub fn validate_settings(settings: &ClubSettings) -> Result<(), ValidationError> {
    if settings.system_name.trim().is_empty() {
        return Err(ValidationError::Rule("System name is required"));
    }
    if !(1..=12).contains(&settings.rewards_reset_period_months) {
        return Err(ValidationError::Rule(
            "Rewards reset period must be between 1 and 12 months",
        ));
    }
    let podium = settings.podium_display_count;
    if !(PODIUM_MIN..=PODIUM_MAX).contains(&podium) || podium % PODIUM_STEP != 0 {
        return Err(ValidationError::Rule(
            "Podium size must be between 5 and 50 in steps of 5",
        ));
    }
    Ok(())
}

pub fn validate_credentials(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<CredentialsUpdate, ValidationError> {
    // Passwords are sent exactly as typed.
    let username = username.trim();

    if username.is_empty() && password.is_empty() {
        return Err(ValidationError::Rule("Enter a new username or password"));
    }
    if !username.is_empty() && username.chars().count() < 3 {
        return Err(ValidationError::Rule(
            "Username must be at least 3 characters",
        ));
    }
    if !password.is_empty() {
        if password.chars().count() < 6 {
            return Err(ValidationError::Rule(
                "Password must be at least 6 characters",
            ));
        }
        if password != confirm_password {
            return Err(ValidationError::Rule("Passwords do not match"));
        }
    }

    Ok(CredentialsUpdate {
        username: username.to_string(),
        password: password.to_string(),
        confirm_password: confirm_password.to_string(),
    })
}

fn toggle_day(days: &[u8], day: u8) -> Vec<u8> {
    let mut next = days.iter().copied().filter(|d| *d != day).collect::<Vec<_>>();
    if next.len() == days.len() {
        next.push(day);
    }
    next.sort_unstable();
    next
}

#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    let club = use_context::<UseStateHandle<ClubSettings>>();

    let system_name = use_state(String::new);
    let working_days = use_state(Vec::<u8>::new);
    let start_time = use_state(|| "09:00".to_string());
    let end_time = use_state(|| "21:00".to_string());
    let max_groups = use_state(|| "1".to_string());
    let block_future = use_state(|| false);
    let reset_period = use_state(|| "1".to_string());
    let podium = use_state(|| "20".to_string());
    let loading = use_state(|| true);
    let saving = use_state(|| false);

    {
        let system_name = system_name.clone();
        let working_days = working_days.clone();
        let start_time = start_time.clone();
        let end_time = end_time.clone();
        let max_groups = max_groups.clone();
        let block_future = block_future.clone();
        let reset_period = reset_period.clone();
        let podium = podium.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_club_settings().await {
                        Ok(settings) => {
                            system_name.set(settings.system_name);
                            working_days.set(settings.working_days);
                            start_time.set(settings.work_start_time);
                            end_time.set(settings.work_end_time);
                            max_groups.set(settings.max_groups_per_slot.to_string());
                            block_future.set(settings.block_future_payments);
                            reset_period.set(settings.rewards_reset_period_months.to_string());
                            podium.set(normalize_podium(settings.podium_display_count).to_string());
                        }
                        Err(err) => dialogs::report("loading club settings", err),
                    }
                    loading.set(false);
                });
                || ()
            },
            (),
        );
    }

    let on_save = {
        let system_name = system_name.clone();
        let working_days = working_days.clone();
        let start_time = start_time.clone();
        let end_time = end_time.clone();
        let max_groups = max_groups.clone();
        let block_future = block_future.clone();
        let reset_period = reset_period.clone();
        let podium = podium.clone();
        let saving = saving.clone();
        Callback::from(move |_| {
            let settings = ClubSettings {
                system_name: system_name.trim().to_string(),
                working_days: (*working_days).clone(),
                work_start_time: (*start_time).clone(),
                work_end_time: (*end_time).clone(),
                max_groups_per_slot: max_groups.trim().parse().unwrap_or(0),
                block_future_payments: *block_future,
                rewards_reset_period_months: reset_period.trim().parse().unwrap_or(0),
                podium_display_count: podium.trim().parse().unwrap_or(0),
            };
            if let Err(err) = validate_settings(&settings) {
                dialogs::alert(&err.to_string());
                return;
            }

            saving.set(true);
            let saving = saving.clone();
            let club = club.clone();
            spawn_local(async move {
                match api::save_club_settings(&settings).await {
                    Ok(_) => {
                        log::info!("club settings saved");
                        if let Some(club) = club {
                            club.set(settings);
                        }
                        dialogs::alert("Settings saved");
                    }
                    Err(err) => dialogs::report("saving club settings", err),
                }
                saving.set(false);
            });
        })
    };

    let day_toggles = WEEKDAYS.iter().map(|(day, label)| {
        let day = *day;
        let selected = working_days.contains(&day);
        let onclick = {
            let working_days = working_days.clone();
            Callback::from(move |_| working_days.set(toggle_day(&working_days, day)))
        };
        let class_name = if selected {
            "px-3 py-2 rounded-[10px] text-[11px] font-bold bg-[#173E63] text-white"
        } else {
            "px-3 py-2 rounded-[10px] text-[11px] font-bold bg-[#f1f4f9] text-[#173E63]"
        };
        html! { <button type="button" class={class_name} onclick={onclick}>{ *label }</button> }
    });

    html! {
        { page_shell(
            "Settings",
            html! {},
            html! {
                <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                    <div class="bg-card rounded-lg p-6 border border-border space-y-4">
                        <h2 class="text-xl font-bold text-foreground">{"Club"}</h2>
                        {
                            if *loading {
                                html! { <p class="text-muted-foreground text-sm">{"Loading..."}</p> }
                            } else {
                                html! {}
                            }
                        }
                        <div class="space-y-1">
                            <label class={LABEL_CLASS}>{"System name"}</label>
                            <input type="text" class={INPUT_CLASS} value={(*system_name).clone()} oninput={bind_input(&system_name)} />
                        </div>
                        <div class="space-y-1">
                            <label class={LABEL_CLASS}>{"Working days"}</label>
                            <div class="flex flex-wrap gap-2">{ for day_toggles }</div>
                        </div>
                        <div class="grid grid-cols-2 gap-3">
                            <div class="space-y-1">
                                <label class={LABEL_CLASS}>{"Work starts"}</label>
                                <input type="time" class={INPUT_CLASS} value={(*start_time).clone()} oninput={bind_input(&start_time)} />
                            </div>
                            <div class="space-y-1">
                                <label class={LABEL_CLASS}>{"Work ends"}</label>
                                <input type="time" class={INPUT_CLASS} value={(*end_time).clone()} oninput={bind_input(&end_time)} />
                            </div>
                        </div>
                        <div class="space-y-1">
                            <label class={LABEL_CLASS}>{"Max groups per time slot"}</label>
                            <input type="number" min="1" class={INPUT_CLASS} value={(*max_groups).clone()} oninput={bind_input(&max_groups)} />
                        </div>
                        <label class="flex items-center gap-3">
                            <input type="checkbox" checked={*block_future} onchange={bind_checkbox(&block_future)} />
                            <span class="text-sm text-foreground">{"Block payments for future months"}</span>
                        </label>
                        <div class="grid grid-cols-2 gap-3">
                            <div class="space-y-1">
                                <label class={LABEL_CLASS}>{"Rewards reset period (months)"}</label>
                                <input type="number" min="1" max="12" class={INPUT_CLASS} value={(*reset_period).clone()} oninput={bind_input(&reset_period)} />
                            </div>
                            <div class="space-y-1">
                                <label class={LABEL_CLASS}>{"Podium size"}</label>
                                <input type="number" min="5" max="50" step="5" class={INPUT_CLASS} value={(*podium).clone()} oninput={bind_input(&podium)} />
                            </div>
                        </div>
                        <button class={PRIMARY_BUTTON} onclick={on_save} disabled={*saving || *loading}>
                            { if *saving { "Saving..." } else { "Save settings" } }
                        </button>
                    </div>
                    <CredentialsCard />
                </div>
            }
        ) }
    }
}

/// Admin login/password card. Hidden for users the backend refuses.
#[function_component(CredentialsCard)]
fn credentials_card() -> Html {
    let visible = use_state(|| false);
    let current_username = use_state(String::new);
    let username = use_state(String::new);
    let password = use_state(String::new);
    let confirm_password = use_state(String::new);
    let saving = use_state(|| false);
    let reload = use_state(|| 0u32);

    {
        let visible = visible.clone();
        let current_username = current_username.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_admin_credentials().await {
                        Ok(creds) => {
                            current_username.set(creds.username.unwrap_or_default());
                            visible.set(true);
                        }
                        Err(err) => {
                            log::info!("admin credentials unavailable: {}", err);
                            visible.set(false);
                        }
                    }
                });
                || ()
            },
            *reload,
        );
    }

    let on_save = {
        let username = username.clone();
        let password = password.clone();
        let confirm_password = confirm_password.clone();
        let saving = saving.clone();
        let reload = reload.clone();
        Callback::from(move |_| {
            let update = match validate_credentials(&username, &password, &confirm_password) {
                Ok(update) => update,
                Err(err) => {
                    dialogs::alert(&err.to_string());
                    return;
                }
            };

            saving.set(true);
            let username = username.clone();
            let password = password.clone();
            let confirm_password = confirm_password.clone();
            let saving = saving.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match api::save_admin_credentials(&update).await {
                    Ok(resp) => {
                        dialogs::alert(&resp.message_or("Credentials updated"));
                        username.set(String::new());
                        password.set(String::new());
                        confirm_password.set(String::new());
                        reload.set(*reload + 1);
                    }
                    Err(err) => dialogs::report("updating admin credentials", err),
                }
                saving.set(false);
            });
        })
    };

    if !*visible {
        return html! {};
    }

    html! {
        <div class="bg-card rounded-lg p-6 border border-border space-y-4">
            <h2 class="text-xl font-bold text-foreground">{"Administrator"}</h2>
            <p class="text-sm text-muted-foreground">
                {"Current username: "}
                <span class="font-bold text-[#173E63]">{ (*current_username).clone() }</span>
            </p>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"New username"}</label>
                <input type="text" class={INPUT_CLASS} value={(*username).clone()} oninput={bind_input(&username)} />
            </div>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"New password"}</label>
                <input type="password" class={INPUT_CLASS} value={(*password).clone()} oninput={bind_input(&password)} />
            </div>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Confirm password"}</label>
                <input type="password" class={INPUT_CLASS} value={(*confirm_password).clone()} oninput={bind_input(&confirm_password)} />
            </div>
            <button class={PRIMARY_BUTTON} onclick={on_save} disabled={*saving}>
                { if *saving { "Saving..." } else { "Update credentials" } }
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> ClubSettings {
        ClubSettings {
            system_name: "FC Qorasuv".into(),
            working_days: vec![1, 3, 5],
            ..ClubSettings::default()
        }
    }

    #[test]
    fn podium_rounds_to_step_and_clamps() {
        assert_eq!(normalize_podium(20), 20);
        assert_eq!(normalize_podium(22), 20);
        assert_eq!(normalize_podium(23), 25);
        assert_eq!(normalize_podium(0), 5);
        assert_eq!(normalize_podium(2), 5);
        assert_eq!(normalize_podium(99), 50);
    }

    #[test]
    fn settings_rules() {
        assert_eq!(validate_settings(&valid_settings()), Ok(()));

        let unnamed = ClubSettings {
            system_name: "  ".into(),
            ..valid_settings()
        };
        assert!(validate_settings(&unnamed).is_err());

        for period in [0, 13] {
            let settings = ClubSettings {
                rewards_reset_period_months: period,
                ..valid_settings()
            };
            assert!(validate_settings(&settings).is_err(), "{period}");
        }

        for podium in [0, 4, 17, 55] {
            let settings = ClubSettings {
                podium_display_count: podium,
                ..valid_settings()
            };
            assert!(validate_settings(&settings).is_err(), "{podium}");
        }
        let podium_fifty = ClubSettings {
            podium_display_count: 50,
            ..valid_settings()
        };
        assert_eq!(validate_settings(&podium_fifty), Ok(()));
    }

    #[test]
    fn credentials_need_at_least_one_change() {
        assert_eq!(
            validate_credentials("", "", ""),
            Err(ValidationError::Rule("Enter a new username or password"))
        );
    }

    #[test]
    fn credential_lengths_and_confirmation() {
        assert!(validate_credentials("ab", "", "").is_err());
        assert!(validate_credentials("", "12345", "12345").is_err());
        assert_eq!(
            validate_credentials("", "secret1", "secret2"),
            Err(ValidationError::Rule("Passwords do not match"))
        );

        let update = validate_credentials(" coach ", "", "").unwrap();
        assert_eq!(update.username, "coach");
        assert_eq!(update.password, "");

        let update = validate_credentials("", "secret1", "secret1").unwrap();
        assert_eq!(update.password, "secret1");
    }

    #[test]
    fn password_whitespace_is_kept() {
        let update = validate_credentials("", " secret1 ", " secret1 ").unwrap();
        assert_eq!(update.password, " secret1 ");
        assert_eq!(update.confirm_password, " secret1 ");

        assert_eq!(
            validate_credentials("", " secret1 ", "secret1"),
            Err(ValidationError::Rule("Passwords do not match"))
        );
    }

    #[test]
    fn no_working_days_is_allowed() {
        let settings = ClubSettings {
            working_days: vec![],
            ..valid_settings()
        };
        assert_eq!(validate_settings(&settings), Ok(()));
    }

    #[test]
    fn day_toggle_adds_and_removes() {
        assert_eq!(toggle_day(&[1, 3], 2), vec![1, 2, 3]);
        assert_eq!(toggle_day(&[1, 2, 3], 2), vec![1, 3]);
    }
}

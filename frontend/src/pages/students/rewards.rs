use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::{bind_select, Modal, INPUT_CLASS, LABEL_CLASS, PRIMARY_BUTTON};
use crate::dates::format_datetime;
use crate::dialogs;
use crate::error::ValidationError;
use crate::filters::optional_id;
use crate::models::{IssueReward, Reward, RewardIssuance, StudentSummary};

pub fn reward_label(reward: &Reward) -> String {
    format!("{} (+{} points)", reward.name, reward.points)
}

#[derive(Properties, PartialEq)]
pub struct RewardModalProps {
    pub student: StudentSummary,
    pub on_close: Callback<()>,
}

#[function_component(GiveRewardModal)]
pub fn give_reward_modal(props: &RewardModalProps) -> Html {
    let rewards = use_state(Vec::<Reward>::new);
    let chosen = use_state(String::new);
    let saving = use_state(|| false);

    {
        let rewards = rewards.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_rewards().await {
                        Ok(list) => rewards.set(list),
                        Err(err) => dialogs::report("loading reward types", err),
                    }
                });
                || ()
            },
            (),
        );
    }

    let on_submit = {
        let chosen = chosen.clone();
        let saving = saving.clone();
        let student_id = props.student.id;
        let on_close = props.on_close.clone();
        Callback::from(move |_| {
            let Some(reward_type_id) = optional_id(&chosen) else {
                return dialogs::alert(&ValidationError::Rule("Choose a reward").to_string());
            };

            saving.set(true);
            let saving = saving.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                match api::issue_reward(student_id, &IssueReward { reward_type_id }).await {
                    Ok(resp) => {
                        dialogs::alert(&resp.message_or("Reward issued"));
                        on_close.emit(());
                    }
                    Err(err) => dialogs::report("issuing reward", err),
                }
                saving.set(false);
            });
        })
    };

    html! {
        <Modal title={format!("Reward: {}", props.student.full_name)} on_close={props.on_close.clone()}>
            <div class="space-y-1">
                <label class={LABEL_CLASS}>{"Reward"}</label>
                <select class={INPUT_CLASS} onchange={bind_select(&chosen)}>
                    <option value="" selected={chosen.is_empty()}>{"Choose a reward"}</option>
                    { for rewards.iter().map(|r| html! {
                        <option value={r.id.to_string()} selected={*chosen == r.id.to_string()}>{ reward_label(r) }</option>
                    }) }
                </select>
            </div>
            <button class={PRIMARY_BUTTON} onclick={on_submit} disabled={*saving}>{ if *saving { "Saving..." } else { "Give reward" } }</button>
        </Modal>
    }
}

#[function_component(RewardHistoryModal)]
pub fn reward_history_modal(props: &RewardModalProps) -> Html {
    let history = use_state(|| None::<Vec<RewardIssuance>>);

    {
        let history = history.clone();
        let student_id = props.student.id;
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_reward_history(student_id).await {
                        Ok(list) => history.set(Some(list)),
                        Err(err) => {
                            dialogs::report("loading reward history", err);
                            history.set(Some(Vec::new()));
                        }
                    }
                });
                || ()
            },
            props.student.id,
        );
    }

    let body = match &*history {
        None => html! { <p class="text-sm text-muted-foreground">{"Loading..."}</p> },
        Some(list) if list.is_empty() => {
            html! { <p class="text-sm text-muted-foreground">{"No rewards issued"}</p> }
        }
        Some(list) => html! {
            <div class="divide-y divide-border">
                { for list.iter().map(|r| html! {
                    <div class="py-3 flex items-center justify-between">
                        <div>
                            <p class="text-sm font-bold text-[#173E63]">{ r.reward_name.clone() }</p>
                            <p class="text-[11px] text-muted-foreground">
                                { r.issued_at.as_deref().map(format_datetime).unwrap_or_else(|| "-".into()) }
                                { format!(" · Issued by {}", r.issuer_name) }
                            </p>
                        </div>
                        <span class="text-sm font-bold text-green-600">{ format!("+{}", r.points) }</span>
                    </div>
                }) }
            </div>
        },
    };

    html! {
        <Modal title={format!("Rewards: {}", props.student.full_name)} on_close={props.on_close.clone()}>
            { body }
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_options_show_points() {
        let reward = Reward {
            id: 2,
            name: "Best player".into(),
            points: 15,
        };
        assert_eq!(reward_label(&reward), "Best player (+15 points)");
    }
}

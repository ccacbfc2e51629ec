mod form;
mod payments;
mod rewards;

use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api;
use crate::components::{
    bind_select, empty_row, icon_filter, icon_plus, page_shell, panel, photo_url, DANGER_BUTTON,
    INPUT_CLASS, LABEL_CLASS, LINK_BUTTON, PRIMARY_BUTTON, SECONDARY_BUTTON,
};
use crate::config::{api_base_url, BrowserStorage};
use crate::debounce::{Debouncer, FILTER_DEBOUNCE_MS};
use crate::dialogs;
use crate::filters::{optional_id, optional_text, StudentFilter};
use crate::models::{status_label, ClubSettings, Group, StudentSummary, Tariff};

use form::{StudentFormModal, STATUSES};
use payments::PaymentModal;
use rewards::{GiveRewardModal, RewardHistoryModal};

#[derive(Clone, PartialEq)]
enum StudentModal {
    Closed,
    Add,
    Edit(i64),
    Payments(StudentSummary),
    Reward(StudentSummary),
    History(StudentSummary),
}

/// Bumping the roster revision re-fetches the students list.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct RosterRevision(u32);

impl Reducible for RosterRevision {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(RosterRevision(self.0.wrapping_add(1)))
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "active" => "bg-green-100 text-green-700 px-2.5 py-1 rounded-md text-[9px] font-bold",
        "blacklist" => "bg-red-100 text-red-600 px-2.5 py-1 rounded-md text-[9px] font-bold",
        _ => "bg-slate-100 text-slate-600 px-2.5 py-1 rounded-md text-[9px] font-bold",
    }
}

#[function_component(StudentsPage)]
pub fn students_page() -> Html {
    let club = use_context::<UseStateHandle<ClubSettings>>();
    let block_future = club.map(|c| c.block_future_payments).unwrap_or(false);

    let students = use_state(Vec::<StudentSummary>::new);
    let groups = use_state(Vec::<Group>::new);
    let tariffs = use_state(Vec::<Tariff>::new);
    let loading = use_state(|| true);
    let roster = use_reducer(RosterRevision::default);

    let show_filters = use_state(|| false);
    let name_input = use_state(String::new);
    let name_filter = use_state(String::new);
    let group = use_state(String::new);
    let status = use_state(String::new);
    let debouncer = use_state(Debouncer::default);
    let modal = use_state(|| StudentModal::Closed);

    {
        let groups = groups.clone();
        let tariffs = tariffs.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_groups().await {
                        Ok(list) => groups.set(list),
                        Err(err) => dialogs::report("loading groups", err),
                    }
                    match api::fetch_tariffs().await {
                        Ok(list) => tariffs.set(list),
                        Err(err) => dialogs::report("loading tariffs", err),
                    }
                });
                || ()
            },
            (),
        );
    }

    {
        let students = students.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_students().await {
                        Ok(list) => {
                            log::debug!("loaded {} students", list.len());
                            students.set(list);
                        }
                        Err(err) => dialogs::report("loading students", err),
                    }
                    loading.set(false);
                });
                || ()
            },
            roster.0,
        );
    }

    let filter = StudentFilter {
        name: (*name_filter).clone(),
        group_id: optional_id(&group),
        status: optional_text(&status),
    };
    let rows = filter.apply(&students);

    let on_name_input = {
        let name_input = name_input.clone();
        let name_filter = name_filter.clone();
        let debouncer = (*debouncer).clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            name_input.set(value.clone());
            let name_filter = name_filter.clone();
            debouncer.schedule(FILTER_DEBOUNCE_MS, move || name_filter.set(value));
        })
    };

    let on_reset = {
        let name_input = name_input.clone();
        let name_filter = name_filter.clone();
        let group = group.clone();
        let status = status.clone();
        let debouncer = (*debouncer).clone();
        Callback::from(move |_| {
            debouncer.cancel();
            name_input.set(String::new());
            name_filter.set(String::new());
            group.set(String::new());
            status.set(String::new());
        })
    };

    let toggle_filters = {
        let show_filters = show_filters.clone();
        Callback::from(move |_| show_filters.set(!*show_filters))
    };
    let open = |next: StudentModal| {
        let modal = modal.clone();
        Callback::from(move |_: MouseEvent| modal.set(next.clone()))
    };
    let close_modal = {
        let modal = modal.clone();
        Callback::from(move |_| modal.set(StudentModal::Closed))
    };
    let on_saved = {
        let modal = modal.clone();
        let roster = roster.dispatcher();
        Callback::from(move |_| {
            modal.set(StudentModal::Closed);
            roster.dispatch(());
        })
    };

    let base_url = api_base_url(&BrowserStorage);

    let row_html = |student: &StudentSummary| {
        let on_delete = {
            let roster = roster.dispatcher();
            let id = student.id;
            let name = student.full_name.clone();
            Callback::from(move |_| {
                if !dialogs::confirm(&format!("Delete student {}?", name)) {
                    return;
                }
                let roster = roster.clone();
                spawn_local(async move {
                    match api::delete_student(id).await {
                        Ok(resp) => {
                            log::info!("student {} deleted", id);
                            dialogs::alert(&resp.message_or("Student deleted"));
                            roster.dispatch(());
                        }
                        Err(err) => dialogs::report("deleting student", err),
                    }
                });
            })
        };
        let photo = student
            .photo_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| photo_url(&base_url, p));

        html! {
            <tr key={student.id} class="text-sm hover:bg-muted/40 transition-colors">
                <td class="px-6 py-4 text-muted-foreground">{ student.number_label() }</td>
                <td class="px-6 py-4">
                    {
                        match photo {
                            Some(src) => html! { <img src={src} alt="" class="w-10 h-10 rounded-full object-cover" /> },
                            None => html! { <div class="w-10 h-10 rounded-full bg-[#D8E1E8]"></div> },
                        }
                    }
                </td>
                <td class="px-6 py-4 text-foreground font-medium">{ student.full_name.clone() }</td>
                <td class="px-6 py-4">{ student.group_name.clone().unwrap_or_else(|| "-".into()) }</td>
                <td class="px-6 py-4">{ student.tariff_name.clone().unwrap_or_else(|| "-".into()) }</td>
                <td class="px-6 py-4"><span class={status_badge(&student.status)}>{ status_label(&student.status) }</span></td>
                <td class="px-6 py-4 text-right space-x-3 whitespace-nowrap">
                    <button class={LINK_BUTTON} onclick={open(StudentModal::Payments(student.clone()))}>{"Payments"}</button>
                    <button class={LINK_BUTTON} onclick={open(StudentModal::Reward(student.clone()))}>{"Reward"}</button>
                    <button class={LINK_BUTTON} onclick={open(StudentModal::History(student.clone()))}>{"History"}</button>
                    <button class={LINK_BUTTON} onclick={open(StudentModal::Edit(student.id))}>{"Edit"}</button>
                    <button class={DANGER_BUTTON} onclick={on_delete}>{"Delete"}</button>
                </td>
            </tr>
        }
    };

    let filter_panel = if *show_filters {
        html! {
            <div class="bg-white p-5 rounded-[10px] shadow-sm grid grid-cols-1 md:grid-cols-4 gap-3 items-end">
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Name"}</label>
                    <input type="text" class={INPUT_CLASS} placeholder="Search by name" value={(*name_input).clone()} oninput={on_name_input} />
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Group"}</label>
                    <select class={INPUT_CLASS} onchange={bind_select(&group)}>
                        <option value="" selected={group.is_empty()}>{"All groups"}</option>
                        { for groups.iter().map(|g| html! {
                            <option value={g.id.to_string()} selected={*group == g.id.to_string()}>{ g.name.clone() }</option>
                        }) }
                    </select>
                </div>
                <div class="space-y-1">
                    <label class={LABEL_CLASS}>{"Status"}</label>
                    <select class={INPUT_CLASS} onchange={bind_select(&status)}>
                        <option value="" selected={status.is_empty()}>{"All statuses"}</option>
                        { for STATUSES.iter().map(|(value, label)| html! {
                            <option value={*value} selected={*status == *value}>{ *label }</option>
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
        StudentModal::Closed => html! {},
        StudentModal::Add => html! {
            <StudentFormModal groups={(*groups).clone()} tariffs={(*tariffs).clone()} on_close={close_modal.clone()} on_saved={on_saved.clone()} />
        },
        StudentModal::Edit(id) => html! {
            <StudentFormModal student_id={*id} groups={(*groups).clone()} tariffs={(*tariffs).clone()} on_close={close_modal.clone()} on_saved={on_saved.clone()} />
        },
        StudentModal::Payments(student) => html! {
            <PaymentModal student={student.clone()} block_future={block_future} on_close={close_modal.clone()} />
        },
        StudentModal::Reward(student) => html! {
            <GiveRewardModal student={student.clone()} on_close={close_modal.clone()} />
        },
        StudentModal::History(student) => html! {
            <RewardHistoryModal student={student.clone()} on_close={close_modal.clone()} />
        },
    };

    html! {
        { page_shell(
            "Students",
            html! {
                <>
                    <button class={SECONDARY_BUTTON} onclick={toggle_filters}>{ icon_filter() }{ if *show_filters { "Hide filters" } else { "Filters" } }</button>
                    <button class={PRIMARY_BUTTON} onclick={open(StudentModal::Add)}>{ icon_plus() }{"Add student"}</button>
                </>
            },
            html! {
                <>
                    { filter_panel }
                    { panel(
                        &format!("Students ({})", rows.len()),
                        html! {},
                        html! {
                            <div class="overflow-x-auto">
                                <table class="w-full text-left border-collapse">
                                    <thead>
                                        <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                            <th class="px-6 py-4 font-bold">{"No."}</th>
                                            <th class="px-6 py-4 font-bold">{"Photo"}</th>
                                            <th class="px-6 py-4 font-bold">{"Name"}</th>
                                            <th class="px-6 py-4 font-bold">{"Group"}</th>
                                            <th class="px-6 py-4 font-bold">{"Tariff"}</th>
                                            <th class="px-6 py-4 font-bold">{"Status"}</th>
                                            <th class="px-6 py-4 font-bold text-right">{"Actions"}</th>
                                        </tr>
                                    </thead>
                                    <tbody class="divide-y divide-border">
                                        {
                                            if *loading {
                                                empty_row(7, "Loading...")
                                            } else if rows.is_empty() {
                                                empty_row(7, "No students found")
                                            } else {
                                                html! { <>{ for rows.iter().map(|s| row_html(*s)) }</> }
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
        ) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_revision_counts_every_bump() {
        let rev = Rc::new(RosterRevision::default());
        let rev = rev.reduce(()).reduce(());
        assert_eq!(*rev, RosterRevision(2));
    }

    #[test]
    fn blacklisted_students_get_the_red_badge() {
        assert!(status_badge("blacklist").contains("bg-red-100"));
        assert!(status_badge("active").contains("bg-green-100"));
        assert!(status_badge("archived").contains("bg-slate-100"));
    }
}

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: AttrValue,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub wide: bool,
    pub children: Children,
}

/// Overlay dialog. Clicking the backdrop or the close button emits `on_close`.
#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    let on_backdrop = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };
    let on_close_button = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());
    let width = if props.wide { "max-w-4xl" } else { "max-w-lg" };

    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/40 p-4" onclick={on_backdrop}>
            <div class={classes!("bg-white", "rounded-[16px]", "shadow-xl", "w-full", "max-h-[90vh]", "overflow-y-auto", width)} onclick={keep_open}>
                <div class="flex items-center justify-between px-6 py-4 border-b border-border">
                    <h3 class="text-lg font-bold text-[#173E63]">{ props.title.clone() }</h3>
                    <button type="button" class="text-slate-400 hover:text-slate-700 text-xl leading-none" aria-label="Close" onclick={on_close_button}>{"×"}</button>
                </div>
                <div class="p-6 space-y-4">
                    { for props.children.iter() }
                </div>
            </div>
        </div>
    }
}

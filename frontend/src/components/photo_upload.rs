use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, File, FileReader, HtmlInputElement};
use yew::prelude::*;

use crate::dialogs;

const STORED_PREFIX: &str = "frontend/static/";
const PASTED_FILE_NAME: &str = "pasted-image.png";

pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Maps a stored photo path to the URL the backend serves it under.
pub fn photo_url(base: &str, stored: &str) -> String {
    let normalised = stored.replace('\\', "/");
    let relative = normalised
        .strip_prefix(STORED_PREFIX)
        .unwrap_or(&normalised)
        .trim_start_matches('/');
    let relative = relative.strip_prefix("static/").unwrap_or(relative);
    format!("{}/static/{}", base.trim_end_matches('/'), relative)
}

/// Clipboard images usually arrive without a name.
pub fn upload_name(name: &str) -> &str {
    if name.trim().is_empty() {
        PASTED_FILE_NAME
    } else {
        name
    }
}

fn read_preview(file: &File, preview: UseStateHandle<Option<String>>) {
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(_) => {
            log::warn!("FileReader is not available");
            return;
        }
    };
    let source = reader.clone();
    let onload = Closure::once_into_js(move || {
        if let Some(data_url) = source.result().ok().and_then(|r| r.as_string()) {
            preview.set(Some(data_url));
        }
    });
    reader.set_onload(Some(onload.unchecked_ref()));
    if reader.read_as_data_url(file).is_err() {
        log::warn!("could not read {} for preview", file.name());
    }
}

#[derive(Properties, PartialEq)]
pub struct PhotoUploadProps {
    /// URL of the photo already stored for the student.
    #[prop_or_default]
    pub existing: Option<AttrValue>,
    pub on_change: Callback<Option<File>>,
}

/// Photo field fed either by the file picker or by pasting an image.
#[function_component(PhotoUpload)]
pub fn photo_upload(props: &PhotoUploadProps) -> Html {
    let preview = {
        let existing = props.existing.clone();
        use_state(move || existing.map(|url| url.to_string()))
    };
    let picker = use_node_ref();

    let accept = {
        let preview = preview.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |file: File| {
            if !is_image_mime(&file.type_()) {
                dialogs::alert("Please choose an image file");
                return;
            }
            read_preview(&file, preview.clone());
            on_change.emit(Some(file));
        })
    };

    let on_pick = {
        let accept = accept.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                accept.emit(file);
            }
        })
    };

    let on_paste = {
        let accept = accept.clone();
        Callback::from(move |e: Event| {
            let Some(items) = e
                .dyn_ref::<ClipboardEvent>()
                .and_then(|e| e.clipboard_data())
                .map(|data| data.items())
            else {
                return;
            };
            let image = (0..items.length())
                .filter_map(|i| items.get(i))
                .filter(|item| item.kind() == "file" && is_image_mime(&item.type_()))
                .find_map(|item| item.get_as_file().ok().flatten());
            if let Some(file) = image {
                e.prevent_default();
                accept.emit(file);
            }
        })
    };

    let on_browse = {
        let picker = picker.clone();
        Callback::from(move |_| {
            if let Some(input) = picker.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_delete = {
        let preview = preview.clone();
        let picker = picker.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |_| {
            preview.set(None);
            if let Some(input) = picker.cast::<HtmlInputElement>() {
                input.set_value("");
            }
            on_change.emit(None);
        })
    };

    html! {
        <div class="flex items-center gap-4">
            <div class="w-24 h-24 rounded-[10px] bg-[#f1f4f9] flex items-center justify-center overflow-hidden">
                {
                    match &*preview {
                        Some(src) => html! { <img src={src.clone()} alt="Photo" class="w-full h-full object-cover" /> },
                        None => html! { <span class="text-[10px] text-slate-400 text-center px-2">{"No photo"}</span> },
                    }
                }
            </div>
            <div class="flex-1 space-y-2">
                <input ref={picker} type="file" accept="image/*" class="hidden" onchange={on_pick} />
                <div class="flex gap-2">
                    <button type="button" class="bg-[#B2CBDE] text-[#173E63] px-3 py-2 rounded-[10px] text-[11px] font-bold" onclick={on_browse}>{"Choose photo"}</button>
                    {
                        if preview.is_some() {
                            html! { <button type="button" class="text-red-500 text-[11px] font-bold" onclick={on_delete}>{"Delete photo"}</button> }
                        } else {
                            html! {}
                        }
                    }
                </div>
                <input type="text" readonly={true} placeholder="Or paste an image here (Ctrl+V)" onpaste={on_paste}
                    class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_images_are_accepted() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("IMAGE/JPEG"));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime(""));
    }

    #[test]
    fn stored_paths_map_to_static_urls() {
        let base = "http://localhost:5000";
        assert_eq!(
            photo_url(base, "frontend/static/uploads/students/7.jpg"),
            "http://localhost:5000/static/uploads/students/7.jpg"
        );
        assert_eq!(
            photo_url(base, "frontend\\static\\uploads\\students\\7.jpg"),
            "http://localhost:5000/static/uploads/students/7.jpg"
        );
        assert_eq!(
            photo_url("http://club/", "uploads/a.png"),
            "http://club/static/uploads/a.png"
        );
        assert_eq!(
            photo_url(base, "/static/uploads/a.png"),
            "http://localhost:5000/static/uploads/a.png"
        );
    }

    #[test]
    fn pasted_files_get_a_name() {
        assert_eq!(upload_name(""), "pasted-image.png");
        assert_eq!(upload_name("me.jpg"), "me.jpg");
    }
}

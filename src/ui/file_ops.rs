//! File operations for importing and exporting mind maps.
//!
//! This module handles all file I/O including native file dialogs and
//! WASM-compatible browser-based file operations. Imports replace the whole
//! document; a parse failure leaves the current document untouched and
//! surfaces the error in the toolbar.

use super::state::{FileOperationResult, MindmapApp, PendingExportOperation, PendingImportOperation};
use crate::examples::{build_example, ExampleKind};
use crate::types::Mindmap;
use eframe::egui;

impl MindmapApp {
    /// Handles pending file operations for both native and WASM platforms.
    ///
    /// This method processes completed async file operations and initiates
    /// new ones. Runs at the start of every frame, before any input handling,
    /// so an import lands before this frame's gestures see the old document.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context for requesting repaints
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        let mut completed = Vec::new();
        if let Some(receiver) = &self.file.receiver {
            while let Ok(result) = receiver.try_recv() {
                completed.push(result);
            }
        }
        for result in completed {
            self.apply_file_result(result);
        }

        if let Some(PendingExportOperation::SaveJson) = self.file.pending_export.take() {
            match self.mindmap.to_json() {
                Ok(json) => self.deliver_export(ctx, "mindmap.json", json),
                Err(e) => {
                    self.file.last_error = Some(format!("Export failed: {e}"));
                    log::error!("Failed to serialize document: {e}");
                }
            }
        }

        if let Some(PendingImportOperation::PickJson) = self.file.pending_import.take() {
            let ctx = ctx.clone();
            let sender = self.file.sender.clone();

            #[cfg(target_arch = "wasm32")]
            {
                wasm_bindgen_futures::spawn_local(async move {
                    match Self::show_open_file_picker().await {
                        Some(file) => {
                            let filename = file.name();
                            let result = match Self::read_file(file).await {
                                Ok(content) => {
                                    FileOperationResult::ImportLoaded(filename, content)
                                }
                                Err(e) => FileOperationResult::OperationFailed(e),
                            };
                            if let Some(tx) = sender {
                                let _ = tx.send(result);
                            }
                        }
                        None => {
                            log::debug!("Open dialog cancelled or API not supported");
                        }
                    }
                    ctx.request_repaint();
                });
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                tokio::spawn(async move {
                    if let Some(handle) = rfd::AsyncFileDialog::new()
                        .add_filter("JSON", &["json"])
                        .pick_file()
                        .await
                    {
                        let path = handle.path();
                        let result = match std::fs::read_to_string(path) {
                            Ok(json) => FileOperationResult::ImportLoaded(
                                path.display().to_string(),
                                json,
                            ),
                            Err(e) => FileOperationResult::OperationFailed(format!(
                                "Failed to read file: {e}"
                            )),
                        };
                        if let Some(tx) = sender {
                            let _ = tx.send(result);
                        }
                    }
                    ctx.request_repaint();
                });
            }
        }
    }

    /// Applies one completed file operation to the app.
    pub(crate) fn apply_file_result(&mut self, result: FileOperationResult) {
        match result {
            FileOperationResult::ImportLoaded(name, content) => {
                match Mindmap::from_json(&content) {
                    Ok(map) => {
                        self.replace_document(map);
                        self.file.last_error = None;
                        self.file.status = Some(format!("Imported {name}"));
                        log::info!("Imported document from {name}");
                    }
                    Err(e) => {
                        self.file.last_error = Some(format!("Import failed: {e}"));
                        log::error!("Failed to parse imported document: {e}");
                    }
                }
            }
            FileOperationResult::ExportCompleted(path) => {
                self.file.status = Some(format!("Exported {path}"));
                log::info!("Export completed: {path}");
            }
            FileOperationResult::OperationFailed(error) => {
                self.file.last_error = Some(error.clone());
                log::error!("File operation failed: {error}");
            }
        }
    }

    /// Replaces the document wholesale, dropping every piece of session state
    /// that could reference the old one: any in-flight drag is abandoned, the
    /// selection is purged and an open label editor is closed.
    pub fn replace_document(&mut self, map: Mindmap) {
        self.session.gesture.end();
        self.session.label_edit = None;
        self.mindmap = map;
        self.session.selection.purge_missing(&self.mindmap);
    }

    /// Hands exported content to the platform: a save dialog on native, a
    /// browser download on WASM.
    pub(crate) fn deliver_export(&mut self, ctx: &egui::Context, filename: &str, content: String) {
        let sender = self.file.sender.clone();

        #[cfg(target_arch = "wasm32")]
        {
            let result = match Self::trigger_download(filename, &content) {
                Ok(()) => FileOperationResult::ExportCompleted(filename.to_string()),
                Err(e) => FileOperationResult::OperationFailed(e),
            };
            if let Some(tx) = sender {
                let _ = tx.send(result);
            }
            ctx.request_repaint();
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let ctx = ctx.clone();
            let filename = filename.to_string();
            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .set_file_name(&filename)
                    .save_file()
                    .await
                {
                    let path = handle.path();
                    let result = match std::fs::write(path, content) {
                        Ok(()) => {
                            FileOperationResult::ExportCompleted(path.display().to_string())
                        }
                        Err(e) => {
                            FileOperationResult::OperationFailed(format!("Failed to save file: {e}"))
                        }
                    };
                    if let Some(tx) = sender {
                        let _ = tx.send(result);
                    }
                }
                ctx.request_repaint();
            });
        }
    }

    /// Queues an import: a file picker opens and the chosen document replaces
    /// the current one.
    pub fn import_mindmap(&mut self) {
        self.file.pending_import = Some(PendingImportOperation::PickJson);
    }

    /// Queues a JSON export of the current document.
    pub fn export_json(&mut self) {
        self.file.pending_export = Some(PendingExportOperation::SaveJson);
    }

    /// Replaces the document with an empty one.
    pub fn new_document(&mut self) {
        self.replace_document(Mindmap::new());
        self.session.viewport.reset();
    }

    /// Replaces the document with one of the built-in examples.
    pub fn load_example(&mut self, kind: ExampleKind) {
        self.replace_document(build_example(kind));
        self.session.viewport.reset();
    }

    /// Triggers a file download in the browser (WASM only, Firefox-compatible).
    ///
    /// Creates a temporary anchor element with a blob URL and triggers a download.
    #[cfg(target_arch = "wasm32")]
    pub(crate) fn trigger_download(filename: &str, content: &str) -> Result<(), String> {
        use wasm_bindgen::JsCast;

        let window = web_sys::window().ok_or("No window found")?;
        let document = window.document().ok_or("No document found")?;

        // Create a Blob containing the file content
        let blob_parts = js_sys::Array::new();
        blob_parts.push(&wasm_bindgen::JsValue::from_str(content));

        let mut blob_options = web_sys::BlobPropertyBag::new();
        blob_options.type_("application/json");

        let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &blob_options)
            .map_err(|_| "Failed to create blob")?;

        // Create object URL for the blob
        let url = web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Failed to create object URL")?;

        // Create a temporary anchor element and trigger download
        let anchor = document
            .create_element("a")
            .map_err(|_| "Failed to create anchor element")?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "Failed to cast to anchor element")?;

        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("No body found")?
            .append_child(&anchor)
            .map_err(|_| "Failed to append anchor")?;

        anchor.click();

        document
            .body()
            .ok_or("No body found")?
            .remove_child(&anchor)
            .map_err(|_| "Failed to remove anchor")?;

        // Clean up the object URL
        web_sys::Url::revoke_object_url(&url).map_err(|_| "Failed to revoke object URL")?;

        Ok(())
    }

    /// Opens a file picker dialog in the browser (WASM only, Firefox-compatible).
    ///
    /// Creates a temporary file input element and waits for the user to select a file.
    ///
    /// # Returns
    ///
    /// The selected `File` object, or `None` if the user cancelled or the operation failed.
    #[cfg(target_arch = "wasm32")]
    async fn show_open_file_picker() -> Option<web_sys::File> {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let window = web_sys::window()?;
        let document = window.document()?;

        // Create a file input element
        let input = document
            .create_element("input")
            .ok()?
            .dyn_into::<web_sys::HtmlInputElement>()
            .ok()?;

        input.set_type("file");
        input.set_accept(".json,application/json");
        input.style().set_property("display", "none").ok()?;

        // Create a promise to wait for file selection
        let (sender, receiver) = futures::channel::oneshot::channel::<Option<web_sys::File>>();
        let sender = std::rc::Rc::new(std::cell::RefCell::new(Some(sender)));

        let onchange = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let input = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok());

            if let Some(input) = input {
                let file = input.files().and_then(|files| files.get(0));

                if let Some(sender) = sender.borrow_mut().take() {
                    let _ = sender.send(file);
                }
            }
        }) as Box<dyn FnMut(_)>);

        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();

        // Append to body and trigger click
        document.body()?.append_child(&input).ok()?;
        input.click();

        // Wait for file selection
        let file = receiver.await.ok()??;

        // Clean up
        document.body()?.remove_child(&input).ok()?;

        Some(file)
    }

    /// Reads content from a File object (WASM only).
    ///
    /// Uses the FileReader API to asynchronously read the file contents as text.
    #[cfg(target_arch = "wasm32")]
    async fn read_file(file: web_sys::File) -> Result<String, String> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::JsValue;

        let file_reader =
            web_sys::FileReader::new().map_err(|_| "Failed to create FileReader".to_string())?;

        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            let reader = file_reader.clone();

            let onload = wasm_bindgen::closure::Closure::wrap(Box::new(
                move |_event: web_sys::ProgressEvent| {
                    if let Ok(result) = reader.result() {
                        let _ = resolve.call1(&JsValue::NULL, &result);
                    }
                },
            )
                as Box<dyn FnMut(_)>);

            file_reader.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();

            let onerror = wasm_bindgen::closure::Closure::wrap(Box::new(
                move |_event: web_sys::ProgressEvent| {
                    let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("Failed to read file"));
                },
            )
                as Box<dyn FnMut(_)>);

            file_reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        });

        file_reader
            .read_as_text(&file)
            .map_err(|_| "Failed to start reading file".to_string())?;

        let result = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| format!("Failed to read file: {e:?}"))?;

        result
            .as_string()
            .ok_or_else(|| "File content is not a string".to_string())
    }
}

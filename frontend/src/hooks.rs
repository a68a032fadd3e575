//! Hooks that bind the shared unlock and profile flows to component renders.
//!
//! Each flow lives behind an `Rc` for the lifetime of the component. Async
//! work runs on `spawn_local` and forces a re-render when it settles. Handles
//! carry a snapshot taken at render time so child props compare by content.

use std::rc::Rc;

use speakerdrive_shared::{
    LeadUnlockState, ProfileEditor, ProfileUpdate, ProfileUpdateOutcome, ProfileView,
    UnlockFlow, UnlockStatus, UnlockTracker,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::{HttpProfileApi, HttpUnlockApi};

#[derive(Clone)]
pub struct UseLeadUnlockHandle {
    flow: Rc<UnlockFlow<HttpUnlockApi>>,
    snapshot: UnlockTracker,
    rerender: UseForceUpdateHandle,
}

impl PartialEq for UseLeadUnlockHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.flow, &other.flow) && self.snapshot == other.snapshot
    }
}

impl UseLeadUnlockHandle {
    pub fn state(&self, lead_id: &str) -> LeadUnlockState {
        self.snapshot.state(lead_id)
    }

    pub fn check_status(&self, lead_id: &str) {
        let flow = self.flow.clone();
        let rerender = self.rerender.clone();
        let lead_id = lead_id.to_string();
        spawn_local(async move {
            if let Err(err) = flow.check_status(&lead_id).await {
                gloo::console::error!(format!("Error checking unlock status for {}: {}", lead_id, err));
            }
            rerender.force_update();
        });
    }

    /// Start an unlock. A second call for a lead that is still unlocking is
    /// dropped without a request.
    pub fn unlock(&self, lead_id: &str, on_unlocked: Callback<UnlockStatus>) {
        if let Err(err) = self.flow.begin(lead_id) {
            gloo::console::warn!(err.to_string());
            return;
        }
        self.rerender.force_update();

        let flow = self.flow.clone();
        let rerender = self.rerender.clone();
        let lead_id = lead_id.to_string();
        spawn_local(async move {
            match flow.send_unlock(&lead_id).await {
                Ok(status) => on_unlocked.emit(status),
                Err(err) => gloo::console::error!(format!("Error unlocking lead {}: {}", lead_id, err)),
            }
            rerender.force_update();
        });
    }
}

/// Per-lead unlock state for the calling component.
#[hook]
pub fn use_lead_unlock() -> UseLeadUnlockHandle {
    let flow = use_memo((), |_| UnlockFlow::new(HttpUnlockApi));
    let rerender = use_force_update();
    UseLeadUnlockHandle {
        snapshot: flow.snapshot(),
        flow,
        rerender,
    }
}

#[derive(Clone)]
pub struct UseProfileHandle {
    editor: Rc<ProfileEditor<HttpProfileApi>>,
    profile: Option<ProfileView>,
    error: Option<String>,
    loading: UseStateHandle<bool>,
    rerender: UseForceUpdateHandle,
}

impl PartialEq for UseProfileHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.editor, &other.editor)
            && self.profile == other.profile
            && self.error == other.error
            && *self.loading == *other.loading
    }
}

impl UseProfileHandle {
    pub fn profile(&self) -> Option<ProfileView> {
        self.profile.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }

    pub fn loading(&self) -> bool {
        *self.loading
    }

    pub fn reload(&self) {
        load(self.editor.clone(), self.loading.clone(), self.rerender.clone());
    }

    pub fn update(&self, update: ProfileUpdate, on_done: Callback<ProfileUpdateOutcome>) {
        let editor = self.editor.clone();
        let rerender = self.rerender.clone();
        spawn_local(async move {
            let outcome = editor.update(&update).await;
            if let Some(error) = &outcome.error {
                gloo::console::error!(format!("Error updating profile: {}", error));
            }
            rerender.force_update();
            on_done.emit(outcome);
        });
    }
}

fn load(
    editor: Rc<ProfileEditor<HttpProfileApi>>,
    loading: UseStateHandle<bool>,
    rerender: UseForceUpdateHandle,
) {
    loading.set(true);
    spawn_local(async move {
        if let Err(err) = editor.load().await {
            gloo::console::error!(format!("Error fetching profile: {}", err));
        }
        loading.set(false);
        rerender.force_update();
    });
}

/// The signed-in user's profile, loaded on mount.
#[hook]
pub fn use_profile() -> UseProfileHandle {
    let editor = use_memo((), |_| ProfileEditor::new(HttpProfileApi));
    let loading = use_state(|| true);
    let rerender = use_force_update();

    {
        let editor = editor.clone();
        let loading = loading.clone();
        let rerender = rerender.clone();
        use_effect_with((), move |_| {
            load(editor, loading, rerender);
            || ()
        });
    }

    let profile = editor.profile().clone();
    let error = editor.error();
    UseProfileHandle {
        profile,
        error,
        editor,
        loading,
        rerender,
    }
}

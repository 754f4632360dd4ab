//! 设置页面
//!
//! 编辑当前用户资料：先提交到服务端，成功后通过会话容器的
//! `update_user` 合并到本地会话并重新持久化。

use leptos::prelude::*;
use leptos::task::spawn_local;
use panoptic_shared::UserPatch;
use panoptic_shared::protocol::UpdateProfileRequest;

use super::icons::Cog;
use super::nav::NavBar;
use crate::api::{ApiError, PanopticApi};
use crate::session::use_session;

#[component]
pub fn SettingsPage() -> impl IntoView {
    let session = use_session();
    let snapshot = session.snapshot();

    let account_id = snapshot
        .user
        .as_ref()
        .map(|u| u.id.clone())
        .unwrap_or_default();
    let role_label = snapshot
        .user
        .as_ref()
        .map(|u| u.role.label())
        .unwrap_or("--");

    let (display_name, set_display_name) = signal(
        snapshot
            .user
            .as_ref()
            .map(|u| u.display_name.clone())
            .unwrap_or_default(),
    );
    let (email, set_email) = signal(
        snapshot
            .user
            .as_ref()
            .map(|u| u.email.clone())
            .unwrap_or_default(),
    );
    let (is_submitting, set_is_submitting) = signal(false);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let on_submit = {
        let session = session.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(token) = session.snapshot().token else {
                return;
            };

            let patch = UserPatch {
                display_name: Some(display_name.get()),
                email: Some(email.get()),
                role: None,
            };

            set_is_submitting.set(true);
            let session = session.clone();
            spawn_local(async move {
                let api = PanopticApi::authorized(token);
                let request = UpdateProfileRequest {
                    patch: patch.clone(),
                };
                match api.send(&request).await {
                    Ok(_) => {
                        // 注销后才返回的结果不再写入会话
                        if session.snapshot().is_authenticated {
                            session.update_user(&patch);
                            set_notice.try_set(Some(("资料已保存".to_string(), false)));
                        }
                    }
                    Err(ApiError::Unauthorized) => session.logout(),
                    Err(e) => {
                        set_notice.try_set(Some((format!("保存失败: {}", e), true)));
                    }
                }
                set_is_submitting.try_set(false);
            });
        }
    };

    // 3秒后清除通知
    Effect::new(move |_| {
        if notice.get().is_some() {
            set_timeout(
                move || set_notice.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-3xl mx-auto space-y-8">
                <NavBar />

                <Show when=move || notice.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            let (_, is_err) = notice.get().unwrap_or_default();
                            if is_err {
                                "alert alert-error shadow-lg"
                            } else {
                                "alert alert-success shadow-lg"
                            }
                        }>
                            <span>{move || notice.get().unwrap_or_default().0}</span>
                        </div>
                    </div>
                </Show>

                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_submit>
                        <h3 class="card-title gap-2">
                            <Cog attr:class="h-5 w-5" /> "个人资料"
                        </h3>

                        <div class="form-control">
                            <label class="label" for="display_name">
                                <span class="label-text">"显示名称"</span>
                            </label>
                            <input
                                id="display_name"
                                type="text"
                                on:input=move |ev| set_display_name.set(event_target_value(&ev))
                                prop:value=display_name
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"邮箱"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="divider"></div>

                        <div class="text-sm text-base-content/70 space-y-1">
                            <p>"账号 ID: " <span class="font-mono">{account_id}</span></p>
                            <p>"角色: " {role_label}</p>
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "保存中..." }.into_any()
                                } else {
                                    "保存".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

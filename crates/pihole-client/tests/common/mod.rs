//! In-memory appliance for client contract tests
//!
//! `FakeAppliance` implements `Transport` and keeps DNS, CNAME, custom DNS
//! and domain list state so that create/get/update/delete sequences can be
//! observed end to end without networking. Both API generations are served:
//! requests to `/admin/api.php` are legacy, everything else is current.

#![allow(dead_code)]

use pihole_client::{Client, ClientConfig, Credential};
use pihole_core::traits::{HttpRequest, HttpResponse, Method, Transport};
use pihole_core::Result;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const PASSWORD: &str = "correct horse";
pub const API_TOKEN: &str = "legacy-token";
pub const LEGACY_PATH: &str = "/admin/api.php";

const HOSTS_PATH: &str = "/api/config/dns/hosts";
const CNAME_PATH: &str = "/api/config/dns/cnameRecords";

#[derive(Debug, Clone)]
pub struct DomainRow {
    pub id: i64,
    pub code: i64,
    pub domain: String,
    pub enabled: bool,
    pub comment: String,
}

#[derive(Debug, Default)]
struct State {
    hosts: Vec<String>,
    cnames: Vec<String>,
    custom_dns: Vec<(String, String)>,
    domains: Vec<DomainRow>,
    next_domain_id: i64,
    blocking: bool,
    logins: usize,
    requests: Vec<HttpRequest>,
    mutations: Vec<String>,
}

/// Stateful stand-in for a Pi-hole appliance
pub struct FakeAppliance {
    state: Mutex<State>,
    /// Delay before answering a DELETE, after its effect is applied
    delete_delay: Duration,
}

impl FakeAppliance {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_domain_id: 1,
                blocking: true,
                ..State::default()
            }),
            delete_delay: Duration::ZERO,
        }
    }

    pub fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = delay;
        self
    }

    /// Seed a raw hosts entry (`"<ip> <domain>"`)
    pub fn with_host_entry(self, entry: &str) -> Self {
        self.state.lock().unwrap().hosts.push(entry.to_string());
        self
    }

    /// Seed a raw CNAME entry (`"<domain>,<target>[,<ttl>]"`)
    pub fn with_cname_entry(self, entry: &str) -> Self {
        self.state.lock().unwrap().cnames.push(entry.to_string());
        self
    }

    pub fn with_custom_dns(self, domain: &str, ip: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .custom_dns
            .push((domain.to_string(), ip.to_string()));
        self
    }

    pub fn with_domain(self, code: i64, domain: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.next_domain_id;
            state.next_domain_id += 1;
            state.domains.push(DomainRow {
                id,
                code,
                domain: domain.to_string(),
                enabled: true,
                comment: String::new(),
            });
        }
        self
    }

    pub fn hosts(&self) -> Vec<String> {
        self.state.lock().unwrap().hosts.clone()
    }

    pub fn cnames(&self) -> Vec<String> {
        self.state.lock().unwrap().cnames.clone()
    }

    pub fn custom_dns(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().custom_dns.clone()
    }

    pub fn domains(&self) -> Vec<DomainRow> {
        self.state.lock().unwrap().domains.clone()
    }

    pub fn blocking(&self) -> bool {
        self.state.lock().unwrap().blocking
    }

    pub fn login_calls(&self) -> usize {
        self.state.lock().unwrap().logins
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// State-changing calls received, e.g. `"PUT hosts 10.0.0.1 a.example"`
    pub fn mutations(&self) -> Vec<String> {
        self.state.lock().unwrap().mutations.clone()
    }

    fn handle_current(&self, state: &mut State, request: &HttpRequest) -> HttpResponse {
        let path = request.url.path().to_string();

        if request.method == Method::Post && path == "/api/auth" {
            return login(state, request);
        }

        if request.header("X-FTL-SID").is_none() {
            return HttpResponse::new(
                401,
                r#"{"error":{"key":"unauthorized","message":"Unauthorized"}}"#,
            );
        }

        if request.method == Method::Delete && path.starts_with("/api/auth/") {
            state.mutations.push("DELETE session".to_string());
            return HttpResponse::new(204, "");
        }

        match (request.method, path.as_str()) {
            (Method::Get, HOSTS_PATH) => HttpResponse::new(
                200,
                json!({ "config": { "dns": { "hosts": state.hosts } }, "took": 0.001 }).to_string(),
            ),
            (Method::Get, CNAME_PATH) => HttpResponse::new(
                200,
                json!({ "config": { "dns": { "cnameRecords": state.cnames } }, "took": 0.001 })
                    .to_string(),
            ),
            (method, p) if p.starts_with(HOSTS_PATH) => {
                let entry = segment(p, HOSTS_PATH).replace("%20", " ");
                mutate_list(&mut state.hosts, &mut state.mutations, method, "hosts", entry)
            }
            (method, p) if p.starts_with(CNAME_PATH) => {
                let entry = segment(p, CNAME_PATH).replace("%2C", ",");
                mutate_list(&mut state.cnames, &mut state.mutations, method, "cname", entry)
            }
            _ => HttpResponse::new(404, r#"{"error":{"key":"not_found"}}"#),
        }
    }

    fn handle_legacy(&self, state: &mut State, request: &HttpRequest) -> HttpResponse {
        if request.query_param("auth").as_deref() != Some(API_TOKEN) {
            return HttpResponse::new(200, "[]");
        }

        let param = |name: &str| request.query_param(name);

        if param("customdns").is_some() {
            let domain = param("domain").unwrap_or_default();
            let ip = param("ip").unwrap_or_default();
            return match param("action").as_deref() {
                Some("get") => {
                    let rows: Vec<[String; 2]> = state
                        .custom_dns
                        .iter()
                        .map(|(d, i)| [d.clone(), i.clone()])
                        .collect();
                    HttpResponse::new(200, json!({ "data": rows }).to_string())
                }
                Some("add") => {
                    if state
                        .custom_dns
                        .iter()
                        .any(|(d, _)| d.eq_ignore_ascii_case(&domain))
                    {
                        return ack(false, "This domain already has a custom DNS entry for an IPv4");
                    }
                    state.mutations.push(format!("add customdns {} {}", domain, ip));
                    state.custom_dns.push((domain, ip));
                    ack(true, "")
                }
                Some("delete") => {
                    let before = state.custom_dns.len();
                    state
                        .custom_dns
                        .retain(|(d, i)| !(d == &domain && i == &ip));
                    if state.custom_dns.len() == before {
                        return ack(false, "This domain/ip association does not exist");
                    }
                    state.mutations.push(format!("delete customdns {} {}", domain, ip));
                    ack(true, "")
                }
                _ => HttpResponse::new(200, "[]"),
            };
        }

        if let Some(list) = param("list") {
            let Some(code) = list_code(&list) else {
                return ack(false, "Invalid list");
            };

            if let Some(domain) = param("add") {
                let id = state.next_domain_id;
                state.next_domain_id += 1;
                state.mutations.push(format!("add {} {}", list, domain));
                state.domains.push(DomainRow {
                    id,
                    code,
                    domain: domain.to_lowercase(),
                    enabled: true,
                    comment: param("comment").unwrap_or_default(),
                });
                return ack(true, "Added");
            }

            if let Some(domain) = param("sub") {
                state.mutations.push(format!("sub {} {}", list, domain));
                state
                    .domains
                    .retain(|row| !(row.code == code && row.domain == domain));
                return ack(true, "Removed");
            }

            let rows: Vec<_> = state
                .domains
                .iter()
                .filter(|row| row.code == code)
                .map(|row| {
                    json!({
                        "id": row.id,
                        "type": row.code,
                        "domain": row.domain,
                        "enabled": i32::from(row.enabled),
                        "date_added": 1_700_000_000,
                        "comment": row.comment,
                        "groups": [0]
                    })
                })
                .collect();
            return HttpResponse::new(200, json!({ "data": rows }).to_string());
        }

        if param("enable").is_some() {
            state.blocking = true;
            state.mutations.push("enable".to_string());
        } else if let Some(seconds) = param("disable") {
            state.blocking = false;
            state.mutations.push(format!("disable {}", seconds));
        }

        if param("status").is_some() || param("enable").is_some() || param("disable").is_some() {
            let status = if state.blocking { "enabled" } else { "disabled" };
            return HttpResponse::new(200, json!({ "status": status }).to_string());
        }

        if param("versions").is_some() {
            return HttpResponse::new(
                200,
                json!({
                    "core_update": false, "web_update": false, "FTL_update": true,
                    "core_current": "v5.18.2", "web_current": "v5.21", "FTL_current": "v5.24",
                    "core_latest": "v5.18.2", "web_latest": "v5.21", "FTL_latest": "v5.25",
                    "core_branch": "master", "web_branch": "master", "FTL_branch": "master"
                })
                .to_string(),
            );
        }

        HttpResponse::new(200, "[]")
    }
}

#[async_trait::async_trait]
impl Transport for FakeAppliance {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request.clone());

            if request.url.path() == LEGACY_PATH {
                self.handle_legacy(&mut state, &request)
            } else {
                self.handle_current(&mut state, &request)
            }
        };

        if request.method == Method::Delete && !self.delete_delay.is_zero() {
            tokio::time::sleep(self.delete_delay).await;
        }
        Ok(response)
    }
}

fn login(state: &mut State, request: &HttpRequest) -> HttpResponse {
    let body: serde_json::Value = request
        .body
        .as_deref()
        .and_then(|b| serde_json::from_slice(b).ok())
        .unwrap_or_default();

    if body["password"] != PASSWORD {
        return HttpResponse::new(
            401,
            json!({
                "session": { "valid": false, "totp": false, "sid": null, "validity": -1,
                             "message": "password incorrect" },
                "took": 0.002
            })
            .to_string(),
        );
    }

    state.logins += 1;
    let sid = format!("sid-{}", state.logins);
    HttpResponse::new(
        200,
        json!({
            "session": { "valid": true, "totp": false, "sid": sid, "csrf": "csrf",
                         "validity": 300, "message": "password correct" },
            "took": 0.002
        })
        .to_string(),
    )
}

fn segment(path: &str, prefix: &str) -> String {
    path[prefix.len()..].trim_start_matches('/').to_string()
}

fn mutate_list(
    list: &mut Vec<String>,
    mutations: &mut Vec<String>,
    method: Method,
    name: &str,
    entry: String,
) -> HttpResponse {
    match method {
        Method::Put => {
            if list.contains(&entry) {
                return HttpResponse::new(
                    400,
                    r#"{"error":{"key":"bad_request","message":"Item already present"}}"#,
                );
            }
            mutations.push(format!("PUT {} {}", name, entry));
            list.push(entry);
            HttpResponse::new(201, r#"{"took":0.01}"#)
        }
        Method::Delete => {
            let before = list.len();
            list.retain(|e| e != &entry);
            if list.len() == before {
                return HttpResponse::new(404, r#"{"error":{"key":"not_found"}}"#);
            }
            mutations.push(format!("DELETE {} {}", name, entry));
            HttpResponse::new(204, "")
        }
        _ => HttpResponse::new(405, ""),
    }
}

fn list_code(list: &str) -> Option<i64> {
    match list {
        "white" => Some(0),
        "black" => Some(1),
        "regex_white" => Some(2),
        "regex_black" => Some(3),
        _ => None,
    }
}

fn ack(success: bool, message: &str) -> HttpResponse {
    HttpResponse::new(
        200,
        json!({ "success": success, "message": message }).to_string(),
    )
}

/// Current-API client over the fake appliance
pub fn current_client(appliance: Arc<FakeAppliance>) -> Client {
    let config = ClientConfig::new("http://pi.hole", Credential::password(PASSWORD));
    Client::builder(config)
        .transport(appliance)
        .build()
        .expect("valid config")
}

/// Legacy-API client over the fake appliance
pub fn legacy_client(appliance: Arc<FakeAppliance>) -> Client {
    let config = ClientConfig::new(
        format!("http://pi.hole{}", LEGACY_PATH),
        Credential::api_token(API_TOKEN),
    );
    Client::builder(config)
        .transport(appliance)
        .build()
        .expect("valid config")
}

mod tools;

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::reconcile;
use crate::models::{LedgerRow, MemberIndex};
use crate::provider::{ClubApiClient, PaymentProvider, ProviderError};
use crate::report::summarize_by_payment_type;
use crate::types::Money;

use tools::ToolDescriptor;

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "club-payment-report";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INTERNAL_ERROR: i64 = -32603;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
struct Request {
    method: String,
    #[serde(default)]
    id: Value,
    #[serde(default)]
    params: Value,
}

/// Line-delimited JSON query adapter.
///
/// Reads one JSON-RPC shaped request per stdin line and writes one response
/// per stdout line. Errors are contained at the single-request boundary; the
/// loop keeps serving until the input channel closes.
pub struct Server {
    config: Config,
    provider: Option<Box<dyn PaymentProvider>>,
    tools: Vec<ToolDescriptor>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            provider: None,
            tools: tools::definitions(),
        }
    }

    /// Preinstalls an upstream connection, bypassing lazy initialization
    /// from saved config. Used from tests and when credentials arrive via
    /// CLI flags.
    pub fn with_provider(mut self, provider: Box<dyn PaymentProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Serves requests from stdin until EOF.
    pub async fn run_stdio(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = std::io::stdout();

        info!("Serving on stdio");

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(error) => {
                    warn!("Failed to read request line: {error}");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let response = self.handle_line(&line).await;
            writeln!(stdout, "{response}")?;
            stdout.flush()?;
        }

        Ok(())
    }

    /// Handles one raw request line and always produces a response object.
    pub async fn handle_line(&mut self, line: &str) -> Value {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(error) => {
                return error_response(Value::Null, PARSE_ERROR, format!("Parse error: {error}"))
            }
        };

        let id = request.id.clone();

        match self.handle_request(request).await {
            Ok(response) => response,
            Err(error) => error_response(id, INTERNAL_ERROR, format!("Internal error: {error}")),
        }
    }

    async fn handle_request(&mut self, request: Request) -> Result<Value> {
        match request.method.as_str() {
            "initialize" => Ok(result_response(
                request.id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            )),
            "tools/list" => {
                let listing: Vec<Value> = self.tools.iter().map(ToolDescriptor::as_listing).collect();
                Ok(result_response(request.id, json!({ "tools": listing })))
            }
            "tools/call" => {
                let tool_name = request
                    .params
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let mut arguments = request
                    .params
                    .get("arguments")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();

                self.refresh_provider(&mut arguments);

                let outcome = self.call_tool(&tool_name, &arguments).await;
                let text = serde_json::to_string_pretty(&outcome)?;

                Ok(result_response(
                    request.id,
                    json!({ "content": [{ "type": "text", "text": text }] }),
                ))
            }
            other => Ok(error_response(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }

    /// Installs the upstream connection for a tool call. Credentials passed
    /// in the arguments replace any existing connection wholesale; otherwise
    /// one is built lazily from saved config.
    fn refresh_provider(&mut self, arguments: &mut Map<String, Value>) {
        let bearer_token = arguments
            .remove("bearer_token")
            .and_then(|value| value.as_str().map(str::to_string));
        let club_id = arguments
            .remove("club_id")
            .and_then(|value| value.as_str().map(str::to_string));

        if let (Some(token), Some(club)) = (bearer_token, club_id) {
            self.provider = Some(Box::new(ClubApiClient::new(token, club)));
            return;
        }

        if self.provider.is_none() {
            let saved = self.config.load();
            if let (Some(token), Some(club)) = (saved.bearer_token, saved.club_id) {
                self.provider = Some(Box::new(ClubApiClient::new(token, club)));
            }
        }
    }

    async fn call_tool(&self, tool_name: &str, arguments: &Map<String, Value>) -> Value {
        let argument = |key: &str| -> Option<String> {
            arguments.get(key).and_then(Value::as_str).map(str::to_string)
        };

        match tool_name {
            "get_member_payment_summary" => {
                self.member_payment_summary(&argument("member_name").unwrap_or_default())
                    .await
            }
            "get_all_outstanding_payments" => {
                let limit = arguments
                    .get("limit")
                    .and_then(Value::as_u64)
                    .map(|limit| limit as usize)
                    .unwrap_or(DEFAULT_LIMIT);
                self.all_outstanding_payments(argument("title_filter"), limit).await
            }
            "get_payment_statistics" => self.payment_statistics(argument("title_filter")).await,
            "search_members" => self.search_members(&argument("query").unwrap_or_default()).await,
            other => json!({ "error": format!("Unknown tool: {other}") }),
        }
    }

    fn connected_provider(&self) -> Result<&dyn PaymentProvider, Value> {
        match self.provider.as_deref() {
            Some(provider) => Ok(provider),
            None => Err(json!({
                "error": "API not initialized. Please provide bearer_token and club_id."
            })),
        }
    }

    async fn member_payment_summary(&self, member_name: &str) -> Value {
        let provider = match self.connected_provider() {
            Ok(provider) => provider,
            Err(error) => return error,
        };

        let members = match provider.list_members().await {
            Ok(members) => members,
            Err(error) => return api_error(error),
        };
        let index = MemberIndex::from_records(&members);

        let matches = index.search(member_name);

        if matches.is_empty() {
            let examples: Vec<&str> = index.names().take(10).collect();
            return json!({
                "error": format!("No members found matching '{member_name}'"),
                "available_members": examples,
            });
        }

        if matches.len() > 1 {
            let names: Vec<&str> = matches.iter().map(|(_, name)| *name).collect();
            return json!({
                "error": format!("Multiple members found matching '{member_name}'. Please be more specific."),
                "matching_members": names,
            });
        }

        let (member_id, full_name) = (matches[0].0.to_string(), matches[0].1.to_string());

        let payments = match provider.list_payments().await {
            Ok(payments) => payments,
            Err(error) => return api_error(error),
        };

        let (ledger, _) = reconcile(provider, &payments, &index, &[]).await;
        let member_rows: Vec<&LedgerRow> = ledger
            .iter()
            .filter(|row| row.member_id == member_id)
            .collect();

        if member_rows.is_empty() {
            return json!({
                "member_name": full_name,
                "total_owed": 0.0,
                "outstanding_payments": [],
                "message": format!("{full_name} has no outstanding payments"),
            });
        }

        let total_owed: Money = member_rows.iter().map(|row| row.amount_owed).sum();

        let mut payment_types: BTreeMap<String, Value> = BTreeMap::new();
        for (title, summary) in grouped_rows(&member_rows) {
            let payments: Vec<Value> = summary
                .iter()
                .map(|row| {
                    json!({
                        "payment_title": row.payment_title,
                        "payment_id": row.payment_id,
                        "amount": row.amount_owed,
                        "currency": row.currency,
                    })
                })
                .collect();
            let type_total: Money = summary.iter().map(|row| row.amount_owed).sum();

            payment_types.insert(
                title,
                json!({
                    "count": payments.len(),
                    "total_amount": type_total,
                    "payments": payments,
                }),
            );
        }

        json!({
            "member_name": full_name,
            "total_owed": total_owed,
            "outstanding_payments_count": member_rows.len(),
            "payment_types": payment_types,
        })
    }

    async fn all_outstanding_payments(&self, title_filter: Option<String>, limit: usize) -> Value {
        let provider = match self.connected_provider() {
            Ok(provider) => provider,
            Err(error) => return error,
        };

        let (ledger, stats) = match self.reconcile_snapshot(provider, title_filter.as_deref()).await {
            Ok(run) => run,
            Err(error) => return error,
        };

        let truncated = ledger.len() > limit;
        let rows = &ledger[..limit.min(ledger.len())];

        json!({
            "outstanding_payments": rows,
            "total_count": rows.len(),
            "truncated": truncated,
            "filter_applied": title_filter,
            "statistics": stats,
        })
    }

    async fn payment_statistics(&self, title_filter: Option<String>) -> Value {
        let provider = match self.connected_provider() {
            Ok(provider) => provider,
            Err(error) => return error,
        };

        let (ledger, stats) = match self.reconcile_snapshot(provider, title_filter.as_deref()).await {
            Ok(run) => run,
            Err(error) => return error,
        };

        if ledger.is_empty() {
            return json!({
                "total_outstanding_payments": 0,
                "total_amount_owed": 0.0,
                "unique_members_with_debt": 0,
                "payment_types": {},
                "filter_applied": title_filter,
                "run_statistics": stats,
            });
        }

        let total_amount: Money = ledger.iter().map(|row| row.amount_owed).sum();
        let unique_members: HashSet<&str> =
            ledger.iter().map(|row| row.member_id.as_str()).collect();

        json!({
            "total_outstanding_payments": ledger.len(),
            "total_amount_owed": total_amount,
            "unique_members_with_debt": unique_members.len(),
            "payment_types": summarize_by_payment_type(&ledger),
            "filter_applied": title_filter,
            "run_statistics": stats,
        })
    }

    async fn search_members(&self, query: &str) -> Value {
        let provider = match self.connected_provider() {
            Ok(provider) => provider,
            Err(error) => return error,
        };

        let members = match provider.list_members().await {
            Ok(members) => members,
            Err(error) => return api_error(error),
        };
        let index = MemberIndex::from_records(&members);

        let matches: Vec<Value> = index
            .search(query)
            .into_iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect();

        json!({
            "query": query,
            "total_matches": matches.len(),
            "matching_members": matches,
        })
    }

    async fn reconcile_snapshot(
        &self,
        provider: &dyn PaymentProvider,
        title_filter: Option<&str>,
    ) -> Result<(Vec<LedgerRow>, crate::models::RunStatistics), Value> {
        let members = provider.list_members().await.map_err(api_error)?;
        let payments = provider.list_payments().await.map_err(api_error)?;
        let index = MemberIndex::from_records(&members);

        let filters: Vec<String> = title_filter.map(str::to_string).into_iter().collect();

        Ok(reconcile(provider, &payments, &index, &filters).await)
    }
}

/// Groups borrowed ledger rows by payment title, preserving title order.
fn grouped_rows<'a>(rows: &[&'a LedgerRow]) -> BTreeMap<String, Vec<&'a LedgerRow>> {
    let mut groups: BTreeMap<String, Vec<&LedgerRow>> = BTreeMap::new();

    for row in rows {
        groups.entry(row.payment_title.clone()).or_default().push(row);
    }

    groups
}

fn api_error(error: ProviderError) -> Value {
    json!({ "error": format!("Club API error: {error}") })
}

fn result_response(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn error_response(id: Value, code: i64, message: String) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

use serde_json::{json, Value};

/// Descriptor for one callable tool, advertised through `tools/list`.
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

impl ToolDescriptor {
    pub fn as_listing(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.parameters,
        })
    }
}

pub fn definitions() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "get_member_payment_summary",
            description: "Get payment summary for a specific club member",
            parameters: json!({
                "type": "object",
                "properties": {
                    "member_name": {
                        "type": "string",
                        "description": "Name of the member to look up (case-insensitive partial match)"
                    }
                },
                "required": ["member_name"]
            }),
        },
        ToolDescriptor {
            name: "get_all_outstanding_payments",
            description: "Get all outstanding payments for the club",
            parameters: json!({
                "type": "object",
                "properties": {
                    "title_filter": {
                        "type": "string",
                        "description": "Optional filter for payment titles (e.g. 'Match Fee', '2025')"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 50
                    }
                }
            }),
        },
        ToolDescriptor {
            name: "get_payment_statistics",
            description: "Get statistics about outstanding payments",
            parameters: json!({
                "type": "object",
                "properties": {
                    "title_filter": {
                        "type": "string",
                        "description": "Optional filter for payment titles"
                    }
                }
            }),
        },
        ToolDescriptor {
            name: "search_members",
            description: "Search for club members by name",
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query for member names"
                    }
                },
                "required": ["query"]
            }),
        },
    ]
}

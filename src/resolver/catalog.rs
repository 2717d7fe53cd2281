use super::ArtifactPayload;
use crate::state::ArtifactBody;
use serde_json::json;

pub struct CatalogEntry {
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub payload: ArtifactPayload,
}

pub const NO_MATCH_TEXT: &str = "No specific artifact could be generated for your query. \
Please try phrases like 'generate sales table' or 'show python script for users'.";

const PYTHON_USER_SCRIPT: &str = "# Mock Python script for user data processing

def process_users(user_list):
  active_users = []
  for user in user_list:
    if user.get('is_active'):
      print(f\"Processing active user: {user.get('name')}\")
      active_users.append(user)
  return active_users

# Example usage:
# users = [{'name': 'Alice', 'is_active': True}, {'name': 'Bob', 'is_active': False}]
# process_users(users)";

const SQL_ACTIVE_CUSTOMERS: &str = "SELECT
  customer_id,
  first_name,
  last_name,
  email,
  last_login_date
FROM
  customers
WHERE
  is_active = TRUE
  AND last_login_date >= CURRENT_DATE - INTERVAL '30 days'
ORDER BY
  last_login_date DESC;";

const JS_FORM_VALIDATION: &str = "// Mock JavaScript for UI form validation

function validateEmail(email) {
  if (!email) return false;
  const emailRegex = /^[^\\s@]+@[^\\s@]+\\.[^\\s@]+$/;
  return emailRegex.test(email);
}

function validatePassword(password) {
  if (!password || password.length < 8) return false;
  return true;
}

// Example usage:
// const emailInput = document.getElementById('email');
// const isValid = validateEmail(emailInput.value);
// console.log('Email is valid:', isValid);";

/// Fixed artifact catalog, in match priority order.
pub fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            description: "A mock JSON data table for sales figures.",
            keywords: &["sales", "revenue", "table", "data", "report"],
            payload: ArtifactPayload {
                title: Some("Quarterly Sales Report".to_string()),
                body: ArtifactBody::Data {
                    format: "json".to_string(),
                    columns: columns(&["Quarter", "Product Category", "Total Sales", "Units Sold"]),
                    rows: vec![
                        vec![json!("Q1 2024"), json!("Electronics"), json!(150000), json!(350)],
                        vec![json!("Q1 2024"), json!("Appliances"), json!(120000), json!(200)],
                        vec![json!("Q2 2024"), json!("Electronics"), json!(175000), json!(400)],
                        vec![json!("Q2 2024"), json!("Appliances"), json!(110000), json!(180)],
                    ],
                },
            },
        },
        CatalogEntry {
            description: "A mock JSON data table for product inventory.",
            keywords: &["product", "inventory", "stock", "table", "data"],
            payload: ArtifactPayload {
                title: Some("Product Inventory Levels".to_string()),
                body: ArtifactBody::Data {
                    format: "json".to_string(),
                    columns: columns(&["Product ID", "Name", "Category", "Stock Level", "Reorder Point"]),
                    rows: vec![
                        vec![json!("PID001"), json!("Laptop Pro X"), json!("Electronics"), json!(75), json!(50)],
                        vec![json!("PID002"), json!("Smart Thermostat"), json!("Home Automation"), json!(120), json!(100)],
                        vec![json!("PID003"), json!("Wireless Mouse"), json!("Accessories"), json!(300), json!(150)],
                        vec![json!("PID004"), json!("Coffee Maker Deluxe"), json!("Appliances"), json!(45), json!(50)],
                    ],
                },
            },
        },
        CatalogEntry {
            description: "A mock Python code snippet for user processing.",
            keywords: &["python", "user", "script", "code", "processing", "analysis"],
            payload: code("Python User Processing Script", "python", PYTHON_USER_SCRIPT),
        },
        CatalogEntry {
            description: "A mock SQL query for fetching active customers.",
            keywords: &["sql", "active", "customer", "query", "database"],
            payload: code("Active Customers Query", "sql", SQL_ACTIVE_CUSTOMERS),
        },
        CatalogEntry {
            description: "A mock JavaScript code snippet for UI form validation.",
            keywords: &["javascript", "js", "ui", "form", "validation", "script", "code"],
            payload: code("JS Form Validation", "javascript", JS_FORM_VALIDATION),
        },
    ]
}

pub fn no_match_payload() -> ArtifactPayload {
    ArtifactPayload {
        title: None,
        body: ArtifactBody::Message {
            content: NO_MATCH_TEXT.to_string(),
        },
    }
}

fn code(title: &str, language: &str, content: &str) -> ArtifactPayload {
    ArtifactPayload {
        title: Some(title.to_string()),
        body: ArtifactBody::Code {
            language: language.to_string(),
            content: content.to_string(),
        },
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

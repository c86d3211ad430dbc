//! Generate deployment descriptor documents: per-function YAML, the service
//! descriptor, runtime shims, and the output-handling stub.

use std::collections::BTreeMap;

use crate::layout::naming::slugify;
use crate::model::types::{ComputeBlock, Language, Project};

use super::events::TriggerEvent;

/// Generate one function descriptor. `function_name` is the block's resolved
/// directory component, so the repository tree and the descriptor tree agree.
pub fn gen_function_yml(
    function_name: &str,
    block: &ComputeBlock,
    events: &[TriggerEvent],
    environment: &BTreeMap<String, String>,
) -> String {
    let runtime = block.language.runtime().unwrap_or("provided");
    let mut lines = Vec::new();

    lines.push(format!("{}:", function_name));
    lines.push(format!(
        "  handler: handlers/{}_shim.handler",
        function_name
    ));
    lines.push(format!("  runtime: {}", runtime));
    lines.push(format!("  memorySize: {}", block.memory));
    lines.push(format!("  timeout: {}", block.max_execution_time));
    if let Some(concurrency) = block.reserved_concurrency {
        lines.push(format!("  reservedConcurrency: {}", concurrency));
    }

    if !block.layers.is_empty() {
        lines.push("  layers:".to_string());
        for layer in &block.layers {
            lines.push(format!("    - {}", layer));
        }
    }

    if !environment.is_empty() {
        lines.push("  environment:".to_string());
        for (key, value) in environment {
            lines.push(format!("    {}: {}", key, value));
        }
    }

    if !events.is_empty() {
        lines.push("  events:".to_string());
        for event in events {
            match event {
                TriggerEvent::Schedule { expression } => {
                    lines.push(format!("    - schedule: {}", expression));
                }
                TriggerEvent::Sns { topic } => {
                    lines.push(format!("    - sns: {}", topic));
                }
                TriggerEvent::Sqs { queue, batch_size } => {
                    lines.push("    - sqs:".to_string());
                    lines.push(format!("        queueName: {}", queue));
                    lines.push(format!("        batchSize: {}", batch_size));
                }
                TriggerEvent::Http { path, method } => {
                    lines.push("    - http:".to_string());
                    lines.push(format!("        path: {}", path));
                    lines.push(format!("        method: {}", method));
                }
            }
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Generate the top-level service descriptor referencing every function
/// descriptor by relative path.
pub fn gen_service_yml(project: &Project, function_files: &[String]) -> String {
    let mut lines = vec![
        format!("service: {}", slugify(&project.name)),
        String::new(),
        "provider:".to_string(),
        "  name: aws".to_string(),
        String::new(),
    ];

    if function_files.is_empty() {
        lines.push("functions: []".to_string());
    } else {
        lines.push("functions:".to_string());
        for file in function_files {
            lines.push(format!("  - ${{file({})}}", file));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Generate the runtime shim wrapping a block's code file. A language with no
/// runtime mapping gets a placeholder marking the gap instead of failing the
/// whole compile.
pub fn gen_runtime_shim(block: &ComputeBlock) -> String {
    if block.language.runtime().is_none() {
        return placeholder_shim(block.language);
    }

    match block.language {
        Language::Python => "\
import json

from code import main


def handler(event, context):
    result = main(event)
    return {\"statusCode\": 200, \"body\": json.dumps(result)}
"
        .to_string(),
        Language::Nodejs => "\
const { main } = require(\"./code\");

exports.handler = async (event) => {
  const result = await main(event);
  return { statusCode: 200, body: JSON.stringify(result) };
};
"
        .to_string(),
        Language::Ruby => "\
require_relative \"code\"

def handler(event:, context:)
  main(event)
end
"
        .to_string(),
        Language::Go => "\
package main

import \"github.com/aws/aws-lambda-go/lambda\"

func main() {
\tlambda.Start(Handler)
}
"
        .to_string(),
        Language::Php => placeholder_shim(block.language),
    }
}

fn placeholder_shim(language: Language) -> String {
    format!(
        "# Unimplemented runtime shim.\n\
         # No deployment runtime mapping exists for language '{}'; this block\n\
         # deploys with a custom-runtime placeholder until a mapping is added.\n",
        language
    )
}

/// Generate the stub that forwards a block's invocation result downstream.
pub fn gen_output_script() -> String {
    "\
import json
import sys


def handle_output(payload):
    json.dump(payload, sys.stdout)


if __name__ == \"__main__\":
    handle_output(json.load(sys.stdin))
"
    .to_string()
}

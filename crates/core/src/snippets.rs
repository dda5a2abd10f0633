//! Copy-paste integration examples and the API reference shown next to them.
//!
//! Templates use `{endpoint}` as a placeholder so the rendered text always
//! points at the configured service.

pub const REQUEST_SCHEMA: &str = r#"{
  "content": "string"
}"#;

pub const RESPONSE_SCHEMA: &str = r#"{
  "roasts": [
    "string"
  ]
}"#;

pub fn endpoint_line(endpoint: &str) -> String {
    format!("POST {}", endpoint)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Go,
    Rust,
    Php,
    Ruby,
    Curl,
    Wget,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Go,
        Language::Rust,
        Language::Php,
        Language::Ruby,
        Language::Curl,
        Language::Wget,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "Javascript",
            Language::TypeScript => "Typescript",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Php => "Php",
            Language::Ruby => "Ruby",
            Language::Curl => "Curl",
            Language::Wget => "Wget",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|l| l == self).unwrap_or(0)
    }

    pub fn next(&self) -> Language {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Language {
        let n = Self::ALL.len();
        Self::ALL[(self.index() + n - 1) % n]
    }

    pub fn snippet(&self, endpoint: &str) -> String {
        self.template().replace("{endpoint}", endpoint)
    }

    fn template(&self) -> &'static str {
        match self {
            Language::Python => PYTHON,
            Language::JavaScript => JAVASCRIPT,
            Language::TypeScript => TYPESCRIPT,
            Language::Go => GO,
            Language::Rust => RUST,
            Language::Php => PHP,
            Language::Ruby => RUBY,
            Language::Curl => CURL,
            Language::Wget => WGET,
        }
    }
}

const PYTHON: &str = r#"import requests

def generate_roasts(content):
    url = "{endpoint}"

    payload = {
        "content": content
    }

    response = requests.post(url, json=payload)
    return response.json()

# Example usage
result = generate_roasts("Your text here")
print(result)"#;

const JAVASCRIPT: &str = r#"async function generateRoasts(content) {
  const response = await fetch(
    '{endpoint}',
    {
      method: 'POST',
      headers: {
        'Content-Type': 'application/json',
      },
      body: JSON.stringify({ content }),
    }
  );

  return await response.json();
}

// Example usage
generateRoasts('Your text here')
  .then(result => console.log(result))
  .catch(error => console.error(error));"#;

const TYPESCRIPT: &str = r#"interface RoastResponse {
  roasts: string[];
}

async function generateRoasts(content: string): Promise<RoastResponse> {
  const response = await fetch(
    '{endpoint}',
    {
      method: 'POST',
      headers: {
        'Content-Type': 'application/json',
      },
      body: JSON.stringify({ content }),
    }
  );

  return response.json();
}

// Example usage
try {
  const result = await generateRoasts('Your text here');
  console.log(result.roasts);
} catch (error) {
  console.error('Error:', error);
}"#;

const GO: &str = r#"package main

import (
    "bytes"
    "encoding/json"
    "fmt"
    "io"
    "net/http"
)

type RoastRequest struct {
    Content string `json:"content"`
}

type RoastResponse struct {
    Roasts []string `json:"roasts"`
}

func generateRoasts(content string) (*RoastResponse, error) {
    requestBody, err := json.Marshal(RoastRequest{Content: content})
    if err != nil {
        return nil, err
    }

    resp, err := http.Post(
        "{endpoint}",
        "application/json",
        bytes.NewBuffer(requestBody),
    )
    if err != nil {
        return nil, err
    }
    defer resp.Body.Close()

    body, err := io.ReadAll(resp.Body)
    if err != nil {
        return nil, err
    }

    var response RoastResponse
    err = json.Unmarshal(body, &response)
    return &response, err
}

func main() {
    response, err := generateRoasts("Your text here")
    if err != nil {
        fmt.Printf("Error: %v\n", err)
        return
    }
    fmt.Printf("Roasts: %v\n", response.Roasts)
}"#;

const RUST: &str = r#"use serde::{Deserialize, Serialize};
use reqwest::Client;
use anyhow::Result;

#[derive(Serialize)]
struct RoastRequest {
    content: String,
}

#[derive(Deserialize)]
struct RoastResponse {
    roasts: Vec<String>,
}

async fn generate_roasts(content: &str) -> Result<RoastResponse> {
    let client = Client::new();
    let request = RoastRequest {
        content: content.to_string(),
    };

    let response = client
        .post("{endpoint}")
        .json(&request)
        .send()
        .await?
        .json::<RoastResponse>()
        .await?;

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<()> {
    let response = generate_roasts("Your text here").await?;
    println!("Roasts: {:?}", response.roasts);
    Ok(())
}"#;

const PHP: &str = r#"<?php

function generateRoasts($content) {
    $url = '{endpoint}';

    $data = array(
        'content' => $content
    );

    $options = array(
        'http' => array(
            'method'  => 'POST',
            'header'  => 'Content-Type: application/json',
            'content' => json_encode($data)
        )
    );

    $context = stream_context_create($options);
    $result = file_get_contents($url, false, $context);

    return json_decode($result, true);
}

// Example usage
try {
    $result = generateRoasts('Your text here');
    print_r($result);
} catch (Exception $e) {
    echo 'Error: ' . $e->getMessage();
}"#;

const RUBY: &str = r#"require 'net/http'
require 'uri'
require 'json'

def generate_roasts(content)
  uri = URI('{endpoint}')

  request = Net::HTTP::Post.new(uri)
  request['Content-Type'] = 'application/json'
  request.body = { content: content }.to_json

  response = Net::HTTP.start(uri.hostname, uri.port, use_ssl: uri.scheme == 'https') do |http|
    http.request(request)
  end

  JSON.parse(response.body)
end

# Example usage
begin
  result = generate_roasts('Your text here')
  puts result
rescue => e
  puts "Error: #{e.message}"
end"#;

const CURL: &str = r#"curl -X 'POST' \
  '{endpoint}' \
  -H 'accept: application/json' \
  -H 'Content-Type: application/json' \
  -d '{
    "content": "Your text here"
  }'"#;

const WGET: &str = r#"wget --no-check-certificate \
  --method POST \
  --timeout=0 \
  --header 'Content-Type: application/json' \
  --body-data '{
    "content": "Your text here"
  }' \
  '{endpoint}'"#;

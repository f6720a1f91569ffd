#![allow(dead_code)]

use agnostic_router::{Adapter, Method, Request, Response, RouterError};

/// A platform request in the shape of a typical serverless event.
#[derive(Debug, Clone)]
pub struct LambdaEvent {
    pub http_method: String,
    pub raw_path: String,
    pub raw_query: String,
    pub headers: Vec<(String, String)>,
}

impl LambdaEvent {
    /// Translates a generic request the way a load balancer would deliver it.
    pub fn from_request(req: &Request) -> Self {
        let raw_query = req
            .query
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| format!("{key}={v}")))
            .collect::<Vec<_>>()
            .join("&");
        let headers = req
            .headers
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.to_uppercase(), v.clone())))
            .collect();
        Self {
            http_method: req.method.as_str().to_uppercase(),
            raw_path: req.path.clone(),
            raw_query,
            headers,
        }
    }
}

/// The platform reply: single-valued headers joined with commas.
#[derive(Debug, Clone)]
pub struct LambdaReply {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl LambdaReply {
    pub fn into_response(self) -> Response {
        let mut res = Response::new();
        for (key, value) in self.headers {
            res.append_header(&key, value);
        }
        res.status(self.status_code).send(self.body);
        res
    }
}

pub struct LambdaAdapter;

impl Adapter for LambdaAdapter {
    type Native = LambdaEvent;
    type Reply = LambdaReply;

    fn map_request(&self, event: LambdaEvent) -> Result<Request, RouterError> {
        let method = Method::parse(&event.http_method)
            .ok_or_else(|| RouterError::Adapter(format!("unknown method {}", event.http_method)))?;
        let url = if event.raw_query.is_empty() {
            event.raw_path
        } else {
            format!("{}?{}", event.raw_path, event.raw_query)
        };
        let mut req = Request::from_url(method, &url);
        for (key, value) in &event.headers {
            req = req.header(key, value.clone());
        }
        Ok(req)
    }

    fn map_response(&self, res: Response) -> Result<LambdaReply, RouterError> {
        Ok(LambdaReply {
            status_code: res.status_code,
            headers: res
                .headers
                .into_iter()
                .map(|(key, values)| (key, values.join(", ")))
                .collect(),
            body: res.body,
        })
    }
}

/// An adapter that forgets every header on the way in.
pub struct LossyAdapter;

impl Adapter for LossyAdapter {
    type Native = LambdaEvent;
    type Reply = LambdaReply;

    fn map_request(&self, event: LambdaEvent) -> Result<Request, RouterError> {
        LambdaAdapter.map_request(LambdaEvent {
            headers: Vec::new(),
            ..event
        })
    }

    fn map_response(&self, res: Response) -> Result<LambdaReply, RouterError> {
        LambdaAdapter.map_response(res)
    }
}

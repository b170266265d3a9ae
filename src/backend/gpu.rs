/// GPU加速的运动掩码 (使用wgpu)
/// 帧差 + 腐蚀 + 膨胀三遍渲染, 回读为CPU掩码; 标记与轮廓仍在CPU上执行
use image::RgbaImage;

use super::MotionBackend;
use crate::error::GpuError;
use crate::mask::BinaryMask;

const MASK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// GPU运动掩码上下文
/// 独占全部设备资源, 必须显式 dispose (Drop 时也会调用)
pub struct GpuMotionBackend {
    width: u32,
    height: u32,
    state: Option<GpuState>,
}

struct GpuState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    diff_pipeline: wgpu::RenderPipeline,
    morph_pipeline: wgpu::RenderPipeline,
    diff_layout: wgpu::BindGroupLayout,
    morph_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    diff_params: wgpu::Buffer,
    erode_params: wgpu::Buffer,
    dilate_params: wgpu::Buffer,
    inputs: Option<InputTextures>,
    targets: RenderTargets,
}

/// 乒乓输入纹理 (当前帧/上一帧), 尺寸跟随源帧
struct InputTextures {
    textures: [wgpu::Texture; 2],
    // 下标为"当前帧"所在槽位
    diff_bind_groups: [wgpu::BindGroup; 2],
    width: u32,
    height: u32,
    next_slot: usize,
    primed: bool,
}

/// 离屏渲染目标 A/B 与回读缓冲
struct RenderTargets {
    a: wgpu::Texture,
    a_view: wgpu::TextureView,
    b: wgpu::Texture,
    b_view: wgpu::TextureView,
    erode_bind_group: wgpu::BindGroup,
    dilate_bind_group: wgpu::BindGroup,
    readback: wgpu::Buffer,
    padded_bytes_per_row: u32,
    width: u32,
    height: u32,
}

impl GpuMotionBackend {
    /// 创建GPU后端, 不可用时返回None (调用方回退CPU)
    pub fn new(width: u32, height: u32) -> Option<Self> {
        match Self::try_new(width, height) {
            Ok(backend) => Some(backend),
            Err(e) => {
                log::warn!("⚠️  GPU后端不可用: {}", e);
                None
            }
        }
    }

    /// 创建GPU后端并返回失败原因
    ///
    /// 这个过程会:
    /// 1. 选择GPU设备
    /// 2. 编译帧差与形态学两个着色器程序
    /// 3. 创建固定逻辑分辨率的渲染目标
    ///
    /// 注意: 使用pollster::block_on内部处理异步,外部是同步调用
    pub fn try_new(width: u32, height: u32) -> Result<Self, GpuError> {
        let (width, height) = (width.max(1), height.max(1));

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Motion Mask Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))?;

        // 校验错误在错误域中捕获, 其余错误只记录不panic
        device.on_uncaptured_error(Box::new(|e| {
            log::error!("❌ GPU错误: {}", e);
        }));

        let info = adapter.get_info();
        log::info!("🎮 GPU: {} ({:?})", info.name, info.backend);

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let diff_layout = create_bind_group_layout(
            &device,
            "Diff Bind Group Layout",
            &[
                texture_entry(0, true),
                texture_entry(1, true),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                uniform_entry(3),
            ],
        );
        let morph_layout = create_bind_group_layout(
            &device,
            "Morph Bind Group Layout",
            &[texture_entry(0, false), uniform_entry(1)],
        );

        let diff_pipeline = create_pipeline(
            &device,
            &diff_layout,
            "Diff Program",
            &format!("{}{}", FULLSCREEN_VS, DIFF_FS),
        );
        let morph_pipeline = create_pipeline(
            &device,
            &morph_layout,
            "Morph Program",
            &format!("{}{}", FULLSCREEN_VS, MORPH_FS),
        );

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(GpuError::Shader(err.to_string()));
        }

        // 视频帧线性采样, 源分辨率不同时顺带完成缩放
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let diff_params = create_uniform(&device, "Diff Params", &DiffParams::new(0, width, height));
        let erode_params = create_uniform(&device, "Erode Params", &MorphParams::new(true));
        let dilate_params = create_uniform(&device, "Dilate Params", &MorphParams::new(false));

        let targets = RenderTargets::new(
            &device,
            &morph_layout,
            &erode_params,
            &dilate_params,
            width,
            height,
        );

        Ok(Self {
            width,
            height,
            state: Some(GpuState {
                device,
                queue,
                diff_pipeline,
                morph_pipeline,
                diff_layout,
                morph_layout,
                sampler,
                diff_params,
                erode_params,
                dilate_params,
                inputs: None,
                targets,
            }),
        })
    }

    /// 处理一帧, 出错时记录并返回全零掩码
    pub fn process(&mut self, frame: &RgbaImage, threshold: u8) -> BinaryMask {
        self.try_process(frame, threshold).unwrap_or_else(|e| {
            log::error!("❌ GPU处理失败: {}", e);
            BinaryMask::new(self.width, self.height)
        })
    }

    /// 处理一帧
    ///
    /// 构造后(或源尺寸变化后)第一帧没有上一帧, 返回全零掩码且不执行渲染.
    pub fn try_process(&mut self, frame: &RgbaImage, threshold: u8) -> Result<BinaryMask, GpuError> {
        let (width, height) = (self.width, self.height);
        let Some(state) = self.state.as_mut() else {
            log::error!("❌ GPU后端已释放");
            return Ok(BinaryMask::new(width, height));
        };

        let Some(current_slot) = state.upload(frame)? else {
            return Ok(BinaryMask::new(width, height));
        };
        state.render(current_slot, threshold)
    }

    /// 释放全部设备资源, 重复调用为空操作
    pub fn dispose(&mut self) {
        if let Some(state) = self.state.take() {
            state.destroy();
            log::info!("🧹 GPU后端资源已释放");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_none()
    }
}

impl Drop for GpuMotionBackend {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl MotionBackend for GpuMotionBackend {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn logical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 重建渲染目标; 输入纹理与上一帧保持不变
    fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        if let Some(state) = self.state.as_mut() {
            let targets = RenderTargets::new(
                &state.device,
                &state.morph_layout,
                &state.erode_params,
                &state.dilate_params,
                width,
                height,
            );
            std::mem::replace(&mut state.targets, targets).destroy();
        }
    }

    /// 回读失败时跳过本帧
    fn process(&mut self, frame: &RgbaImage, threshold: u8) -> Option<BinaryMask> {
        match self.try_process(frame, threshold) {
            Ok(mask) => Some(mask),
            Err(e) => {
                log::warn!("⚠️  GPU处理失败, 跳过本帧: {}", e);
                None
            }
        }
    }

    fn dispose(&mut self) {
        GpuMotionBackend::dispose(self);
    }
}

impl GpuState {
    /// 上传到不持有上一帧的槽位并交换; 返回当前槽位, 第一帧返回None
    fn upload(&mut self, frame: &RgbaImage) -> Result<Option<usize>, GpuError> {
        let (fw, fh) = frame.dimensions();
        let max_dim = self.device.limits().max_texture_dimension_2d;
        if fw == 0 || fh == 0 || fw > max_dim || fh > max_dim {
            return Err(GpuError::FrameSize {
                width: fw,
                height: fh,
            });
        }

        let stale = self
            .inputs
            .as_ref()
            .map_or(true, |inputs| (inputs.width, inputs.height) != (fw, fh));
        if stale {
            if let Some(old) = self.inputs.take() {
                old.destroy();
            }
            self.inputs = Some(InputTextures::new(
                &self.device,
                &self.diff_layout,
                &self.sampler,
                &self.diff_params,
                fw,
                fh,
            ));
        }
        let Some(inputs) = self.inputs.as_mut() else {
            return Ok(None);
        };

        let slot = inputs.next_slot;
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &inputs.textures[slot],
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * fw),
                rows_per_image: Some(fh),
            },
            wgpu::Extent3d {
                width: fw,
                height: fh,
                depth_or_array_layers: 1,
            },
        );
        inputs.next_slot = 1 - slot;

        let had_previous = inputs.primed;
        inputs.primed = true;
        Ok(had_previous.then_some(slot))
    }

    /// 三遍渲染: 差分→A, 腐蚀A→B, 膨胀B→A, 再回读A
    fn render(&mut self, current_slot: usize, threshold: u8) -> Result<BinaryMask, GpuError> {
        let Some(inputs) = self.inputs.as_ref() else {
            return Err(GpuError::Readback("input textures missing".into()));
        };
        let targets = &self.targets;
        let (width, height) = (targets.width, targets.height);

        self.queue.write_buffer(
            &self.diff_params,
            0,
            bytemuck::bytes_of(&DiffParams::new(threshold, width, height)),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Motion Mask Encoder"),
            });

        draw_pass(
            &mut encoder,
            "Diff Pass",
            &self.diff_pipeline,
            &inputs.diff_bind_groups[current_slot],
            &targets.a_view,
        );
        draw_pass(
            &mut encoder,
            "Erode Pass",
            &self.morph_pipeline,
            &targets.erode_bind_group,
            &targets.b_view,
        );
        draw_pass(
            &mut encoder,
            "Dilate Pass",
            &self.morph_pipeline,
            &targets.dilate_bind_group,
            &targets.a_view,
        );

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &targets.a,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &targets.readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(targets.padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(Some(encoder.finish()));

        // 读取结果
        let buffer_slice = targets.readback.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        // 等待GPU完成 (同步点)
        self.device.poll(wgpu::Maintain::Wait);
        pollster::block_on(rx)
            .map_err(|e| GpuError::Readback(e.to_string()))?
            .map_err(|e| GpuError::Readback(e.to_string()))?;

        // 每像素取R通道最高位
        let data = buffer_slice.get_mapped_range();
        let row_bytes = targets.padded_bytes_per_row as usize;
        let mut mask = Vec::with_capacity(width as usize * height as usize);
        for row in data.chunks_exact(row_bytes).take(height as usize) {
            mask.extend(row.chunks_exact(4).take(width as usize).map(|px| px[0] >> 7));
        }
        drop(data);
        targets.readback.unmap();

        Ok(BinaryMask::from_raw(width, height, mask))
    }

    fn destroy(self) {
        if let Some(inputs) = self.inputs {
            inputs.destroy();
        }
        self.targets.destroy();
        self.diff_params.destroy();
        self.erode_params.destroy();
        self.dilate_params.destroy();
        // 管线/设备随所有权一起释放
    }
}

impl InputTextures {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        params: &wgpu::Buffer,
        width: u32,
        height: u32,
    ) -> Self {
        let textures = [0, 1].map(|i| {
            create_texture(
                device,
                if i == 0 { "Frame Texture 0" } else { "Frame Texture 1" },
                width,
                height,
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            )
        });
        let views = [0, 1].map(|i| textures[i].create_view(&Default::default()));

        let diff_bind_groups = [0usize, 1].map(|current| {
            let previous = 1 - current;
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Diff Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&views[current]),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&views[previous]),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: params.as_entire_binding(),
                    },
                ],
            })
        });

        Self {
            textures,
            diff_bind_groups,
            width,
            height,
            next_slot: 0,
            primed: false,
        }
    }

    fn destroy(self) {
        for texture in &self.textures {
            texture.destroy();
        }
    }
}

impl RenderTargets {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        erode_params: &wgpu::Buffer,
        dilate_params: &wgpu::Buffer,
        width: u32,
        height: u32,
    ) -> Self {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let a = create_texture(
            device,
            "Render Target A",
            width,
            height,
            usage | wgpu::TextureUsages::COPY_SRC,
        );
        let b = create_texture(device, "Render Target B", width, height, usage);
        let a_view = a.create_view(&Default::default());
        let b_view = b.create_view(&Default::default());

        let morph_bind_group = |label: &str, view: &wgpu::TextureView, params: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: params.as_entire_binding(),
                    },
                ],
            })
        };
        let erode_bind_group = morph_bind_group("Erode Bind Group", &a_view, erode_params);
        let dilate_bind_group = morph_bind_group("Dilate Bind Group", &b_view, dilate_params);

        // 行字节数需按 COPY_BYTES_PER_ROW_ALIGNMENT 对齐
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = (width * 4).div_ceil(align) * align;
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: padded_bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            a,
            a_view,
            b,
            b_view,
            erode_bind_group,
            dilate_bind_group,
            readback,
            padded_bytes_per_row,
            width,
            height,
        }
    }

    fn destroy(self) {
        self.a.destroy();
        self.b.destroy();
        self.readback.destroy();
    }
}

fn draw_pass(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
    target: &wgpu::TextureView,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    // 单个三角形覆盖全屏
    pass.draw(0..3, 0..1);
}

fn create_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    usage: wgpu::TextureUsages,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: MASK_FORMAT,
        usage,
        view_formats: &[],
    })
}

fn create_uniform<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    use wgpu::util::DeviceExt;
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn texture_entry(binding: u32, filterable: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
    entries: &[wgpu::BindGroupLayoutEntry],
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries,
    })
}

/// 辅助函数: 编译着色器并创建渲染管线
fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    source: &str,
) -> wgpu::RenderPipeline {
    let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader_module,
            entry_point: "vs_main",
            compilation_options: Default::default(),
            buffers: &[],
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader_module,
            entry_point: "fs_main",
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: MASK_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
        cache: None,
    })
}

/// 帧差参数 (需要16字节对齐)
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DiffParams {
    threshold: f32, // 归一化到0-1
    _padding: f32,
    target_width: f32,
    target_height: f32,
}

impl DiffParams {
    fn new(threshold: u8, width: u32, height: u32) -> Self {
        Self {
            threshold: threshold as f32 / 255.0,
            _padding: 0.0,
            target_width: width as f32,
            target_height: height as f32,
        }
    }
}

/// 形态学参数: erode=1 腐蚀, 0 膨胀
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MorphParams {
    erode: u32,
    _padding: [u32; 3],
}

impl MorphParams {
    fn new(erode: bool) -> Self {
        Self {
            erode: erode as u32,
            _padding: [0; 3],
        }
    }
}

/// 全屏三角形顶点着色器
const FULLSCREEN_VS: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    return vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
}
"#;

/// 帧差片元着色器: 三通道最大差严格大于阈值 → 1
const DIFF_FS: &str = r#"
struct DiffParams {
    threshold: f32,
    _padding: f32,
    target_size: vec2<f32>,
}

@group(0) @binding(0) var current_frame: texture_2d<f32>;
@group(0) @binding(1) var previous_frame: texture_2d<f32>;
@group(0) @binding(2) var frame_sampler: sampler;
@group(0) @binding(3) var<uniform> params: DiffParams;

@fragment
fn fs_main(@builtin(position) pos: vec4<f32>) -> @location(0) vec4<f32> {
    let uv = pos.xy / params.target_size;
    let curr = textureSampleLevel(current_frame, frame_sampler, uv, 0.0).rgb;
    let prev = textureSampleLevel(previous_frame, frame_sampler, uv, 0.0).rgb;
    let d = abs(curr - prev);
    let max_diff = max(d.r, max(d.g, d.b));

    // 回到0-255整数域比较, 与CPU路径一致
    let on = round(max_diff * 255.0) > round(params.threshold * 255.0);
    return vec4<f32>(select(0.0, 1.0, on), 0.0, 0.0, 1.0);
}
"#;

/// 4邻域形态学片元着色器, 边界一圈清零
const MORPH_FS: &str = r#"
struct MorphParams {
    erode: u32,
    _pad0: u32,
    _pad1: u32,
    _pad2: u32,
}

@group(0) @binding(0) var mask_tex: texture_2d<f32>;
@group(0) @binding(1) var<uniform> morph: MorphParams;

@fragment
fn fs_main(@builtin(position) pos: vec4<f32>) -> @location(0) vec4<f32> {
    let size = vec2<i32>(textureDimensions(mask_tex));
    let p = vec2<i32>(pos.xy);
    if (p.x <= 0 || p.y <= 0 || p.x >= size.x - 1 || p.y >= size.y - 1) {
        return vec4<f32>(0.0, 0.0, 0.0, 1.0);
    }

    let c = textureLoad(mask_tex, p, 0).r;
    let l = textureLoad(mask_tex, p + vec2<i32>(-1, 0), 0).r;
    let r = textureLoad(mask_tex, p + vec2<i32>(1, 0), 0).r;
    let t = textureLoad(mask_tex, p + vec2<i32>(0, -1), 0).r;
    let b = textureLoad(mask_tex, p + vec2<i32>(0, 1), 0).r;

    var result: f32;
    if (morph.erode != 0u) {
        result = c * l * r * t * b;
    } else {
        result = max(c, max(l, max(r, max(t, b))));
    }
    return vec4<f32>(result, 0.0, 0.0, 1.0);
}
"#;
